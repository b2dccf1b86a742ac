//! Player preferences
//!
//! Persisted separately from gameplay tuning in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::sim::Simulation;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Muzzle sparks and bullet trails
    pub particles: bool,
    /// Parallax galaxy background
    pub starfield: bool,

    // === Accessibility ===
    /// Suppress the screen flash
    pub reduced_motion: bool,

    // === Layout ===
    /// On-screen controls; `None` follows pointer detection
    pub touch_controls: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            particles: true,
            starfield: true,

            reduced_motion: false,

            touch_controls: None,
        }
    }
}

impl Settings {
    /// Whether on-screen controls should be shown, given what the platform detected
    pub fn touch_enabled(&self, detected: bool) -> bool {
        self.touch_controls.unwrap_or(detected)
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn flash_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Push the preferences that affect the session into it
    pub fn apply_to(&self, sim: &mut Simulation, touch_detected: bool) {
        sim.particles_enabled = self.particles;
        if !self.particles {
            sim.particles.clear();
        }
        sim.touch_controls = self.touch_enabled(touch_detected);
    }

    /// Flip mute and persist the change. Returns the new state.
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.save();
        self.muted
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "mega_invaders_settings";

    /// Parse stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Ignoring stored settings: {}", err);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "touch_controls": false}"#);
        assert!(settings.muted);
        assert_eq!(settings.touch_controls, Some(false));
        assert_eq!(settings.master_volume, 0.8);
        assert!(settings.particles);
    }

    #[test]
    fn test_garbage_falls_back() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
    }

    #[test]
    fn test_apply_to_simulation() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        let settings = Settings {
            particles: false,
            ..Settings::default()
        };
        settings.apply_to(&mut sim, true);
        assert!(!sim.particles_enabled);
        assert!(sim.touch_controls);

        let forced_off = Settings {
            touch_controls: Some(false),
            ..Settings::default()
        };
        forced_off.apply_to(&mut sim, true);
        assert!(!sim.touch_controls);
        assert!(sim.particles_enabled);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.flash_enabled());
        assert!(Settings::default().flash_enabled());
    }

    #[test]
    fn test_toggle_muted() {
        let mut settings = Settings::default();
        assert!(settings.toggle_muted());
        assert!(settings.muted);
        assert!(!settings.toggle_muted());
        assert!(!settings.muted);
    }
}
