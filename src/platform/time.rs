//! Frame timing
//!
//! The display drives the loop, so dt is measured rather than assumed. Long
//! gaps (background tabs, debugger pauses) are clamped so one step never
//! integrates more than a frame's worth of motion.

use crate::consts::MAX_FRAME_DT;

/// Turns successive frame timestamps into step deltas
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame, in `[0, MAX_FRAME_DT]`.
    /// The first frame yields zero.
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (e.g. after the tab becomes visible)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
