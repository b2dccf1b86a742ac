//! Keyboard and touch input
//!
//! Browser events arrive between frames. The latch keeps held controls and
//! counts edge presses, and the driver takes one [`TickInput`] snapshot per
//! frame.

use crate::sim::TickInput;

/// Game controls a key or touch button can map to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Special,
    Confirm,
    Restart,
    /// Toggle the demo autopilot
    Autopilot,
    /// Toggle sound (persisted)
    Mute,
}

/// Map a `KeyboardEvent.key` value to a control
pub fn map_key(key: &str) -> Option<Key> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Key::Left),
        "ArrowRight" | "d" | "D" => Some(Key::Right),
        " " | "Space" | "Spacebar" => Some(Key::Fire),
        "p" | "P" => Some(Key::Pause),
        "m" | "M" => Some(Key::Special),
        "Enter" => Some(Key::Confirm),
        "i" | "I" => Some(Key::Autopilot),
        "n" | "N" => Some(Key::Mute),
        _ => None,
    }
}

/// Whether the browser should suppress the key's default action (scrolling)
pub fn prevents_default(key: &str) -> bool {
    matches!(key, "ArrowLeft" | "ArrowRight" | " ")
}

/// Accumulates input events between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left: bool,
    right: bool,
    fire: bool,
    pause: bool,
    special: bool,
    confirm: bool,
    restart: bool,
    autopilot: bool,
    mute: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Fire => self.fire = true,
            Key::Pause => self.pause = !self.pause,
            Key::Special => self.special = true,
            Key::Confirm => self.confirm = true,
            Key::Restart => self.restart = true,
            Key::Autopilot => self.autopilot = !self.autopilot,
            Key::Mute => self.mute = !self.mute,
        }
    }

    pub fn release(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Fire => self.fire = false,
            _ => {}
        }
    }

    /// Drop every held control (focus loss, pause)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.fire = false;
    }

    /// Latch a pause for the next snapshot without toggling a pending one.
    ///
    /// Used for auto-pause, where a `P` press in the same frame must not
    /// cancel it.
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Whether an autopilot toggle is pending; consumes it
    pub fn take_autopilot_toggle(&mut self) -> bool {
        std::mem::take(&mut self.autopilot)
    }

    pub fn take_mute_toggle(&mut self) -> bool {
        std::mem::take(&mut self.mute)
    }

    /// Snapshot for one step and clear the edges.
    ///
    /// Two pause presses within one frame cancel out. A pause toggle also
    /// releases the held controls so nothing is stuck on resume.
    pub fn snapshot(&mut self, now_ms: f64) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            fire: self.fire,
            pause: std::mem::take(&mut self.pause),
            special: std::mem::take(&mut self.special),
            restart: std::mem::take(&mut self.restart),
            confirm: std::mem::take(&mut self.confirm),
            now_ms,
        };
        if input.pause {
            self.release_all();
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(map_key("A"), Some(Key::Left));
        assert_eq!(map_key("d"), Some(Key::Right));
        assert_eq!(map_key(" "), Some(Key::Fire));
        assert_eq!(map_key("P"), Some(Key::Pause));
        assert_eq!(map_key("m"), Some(Key::Special));
        assert_eq!(map_key("Enter"), Some(Key::Confirm));
        assert_eq!(map_key("i"), Some(Key::Autopilot));
        assert_eq!(map_key("N"), Some(Key::Mute));
        assert_eq!(map_key("x"), None);
        assert!(prevents_default(" "));
        assert!(!prevents_default("p"));
    }

    #[test]
    fn test_held_and_edges() {
        let mut latch = InputLatch::new();
        latch.press(Key::Left);
        latch.press(Key::Special);

        let first = latch.snapshot(10.0);
        assert!(first.left);
        assert!(first.special);
        assert_eq!(first.now_ms, 10.0);

        // Held survives, edge does not
        let second = latch.snapshot(26.0);
        assert!(second.left);
        assert!(!second.special);

        latch.release(Key::Left);
        assert!(!latch.snapshot(42.0).left);
    }

    #[test]
    fn test_pause_releases_held() {
        let mut latch = InputLatch::new();
        latch.press(Key::Right);
        latch.press(Key::Fire);
        latch.press(Key::Pause);

        let input = latch.snapshot(0.0);
        assert!(input.pause);
        assert!(input.right);

        let next = latch.snapshot(16.0);
        assert!(!next.pause);
        assert!(!next.right);
        assert!(!next.fire);
    }

    #[test]
    fn test_double_pause_cancels() {
        let mut latch = InputLatch::new();
        latch.press(Key::Pause);
        latch.press(Key::Pause);
        assert!(!latch.snapshot(0.0).pause);
    }

    #[test]
    fn test_autopilot_toggle_consumed() {
        let mut latch = InputLatch::new();
        latch.press(Key::Autopilot);
        assert!(latch.take_autopilot_toggle());
        assert!(!latch.take_autopilot_toggle());
    }

    #[test]
    fn test_requested_pause_survives_key_press() {
        let mut latch = InputLatch::new();
        latch.press(Key::Pause);
        latch.request_pause();
        assert!(latch.snapshot(0.0).pause);

        // Repeated requests latch a single pause
        latch.request_pause();
        latch.request_pause();
        assert!(latch.snapshot(16.0).pause);
        assert!(!latch.snapshot(32.0).pause);
    }

    #[test]
    fn test_mute_toggle_consumed() {
        let mut latch = InputLatch::new();
        latch.press(Key::Mute);
        latch.press(Key::Fire);
        assert!(latch.take_mute_toggle());
        assert!(!latch.take_mute_toggle());
        assert!(latch.snapshot(0.0).fire);
    }
}
