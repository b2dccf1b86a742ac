//! Mega Invaders - a Space Invaders style arcade game
//!
//! Core modules:
//! - `sim`: Simulation core (formation march, collisions, lives/score/level, Mega attack)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Input latching and frame timing
//! - `audio`: Fire-and-forget sound effects
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical canvas size in pixels (all simulation coordinates use it)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Largest dt a single step may integrate (slow frames are clamped)
    pub const MAX_FRAME_DT: f32 = 0.033;

    /// Lives at the start of every session
    pub const STARTING_LIVES: u8 = 3;
}

/// Convert HSL (hue in degrees, saturation/lightness in 0..=1) to linear RGBA
pub fn hsl_to_rgba(hue: f32, saturation: f32, lightness: f32) -> [f32; 4] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_hsl_primary_colors() {
        assert!(approx(hsl_to_rgba(0.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
        assert!(approx(hsl_to_rgba(120.0, 1.0, 0.5), [0.0, 1.0, 0.0, 1.0]));
        assert!(approx(hsl_to_rgba(240.0, 1.0, 0.5), [0.0, 0.0, 1.0, 1.0]));
        // Hue wraps
        assert!(approx(hsl_to_rgba(360.0, 1.0, 0.5), [1.0, 0.0, 0.0, 1.0]));
    }
}
