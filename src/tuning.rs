//! Data-driven game balance
//!
//! [`Tuning`] carries every gameplay constant the simulation reads. The
//! defaults reproduce the classic feel; a JSON document can override any
//! subset of keys (missing keys keep their default).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CANVAS_WIDTH, STARTING_LIVES};

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Horizontal speed (px/s)
    pub player_speed: f32,
    /// Distance from the canvas bottom to the ship's top edge
    pub player_bottom_offset: f32,
    /// Minimum time between shots (ms)
    pub fire_delay_ms: f32,
    /// Side margin the ship and the formation must stay inside
    pub play_margin: f32,
    /// Extra bottom space reserved when touch controls are shown
    pub touch_ui_margin: f32,
    pub starting_lives: u8,
    /// Grace period after taking damage (s)
    pub invulnerability_secs: f32,

    // === Player bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    /// Spawn height above the ship's top edge
    pub muzzle_offset: f32,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    /// Baseline march speed before the thinning multiplier (px/s)
    pub enemy_march_speed: f32,
    /// Formation descent on each edge bounce
    pub enemy_drop: f32,
    pub wave_margin_x: f32,
    pub wave_margin_y: f32,
    pub wave_row_gap: f32,
    pub enemy_bullet_speed: f32,

    // === Scoring ===
    pub kill_reward: u64,
    pub mega_kill_reward: u64,

    // === Mega attack ===
    pub mega_cooldown_ms: f64,
    pub mega_speed: f32,
    /// Horizontal gap between the two Mega projectiles
    pub mega_gap: f32,
    /// On-canvas width when the image asset is available
    pub mega_image_width: f32,
    /// Pixel-art cell size for the procedural stand-in
    pub mega_cell_size: f32,
    /// Spawn height above the ship's top edge
    pub mega_lift: f32,

    // === Culling ===
    pub bullet_cull_y: f32,
    pub enemy_bullet_cull_margin: f32,
    pub mega_cull_y: f32,

    // === Cosmetics ===
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: 50.0,
            player_height: 20.0,
            player_speed: 360.0,
            player_bottom_offset: 50.0,
            fire_delay_ms: 280.0,
            play_margin: 10.0,
            touch_ui_margin: 110.0,
            starting_lives: STARTING_LIVES,
            invulnerability_secs: 1.2,

            bullet_width: 4.0,
            bullet_height: 10.0,
            bullet_speed: 520.0,
            muzzle_offset: 8.0,

            enemy_width: 28.0,
            enemy_height: 18.0,
            enemy_march_speed: 40.0,
            enemy_drop: 16.0,
            wave_margin_x: 60.0,
            wave_margin_y: 60.0,
            wave_row_gap: 36.0,
            enemy_bullet_speed: 240.0,

            kill_reward: 10,
            mega_kill_reward: 15,

            mega_cooldown_ms: 4500.0,
            mega_speed: 720.0,
            mega_gap: 16.0,
            mega_image_width: 56.0,
            mega_cell_size: 4.0,
            mega_lift: 6.0,

            bullet_cull_y: -20.0,
            enemy_bullet_cull_margin: 20.0,
            mega_cull_y: -40.0,

            max_particles: 256,
        }
    }
}

impl Tuning {
    /// Parse a JSON override document and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("bullet_speed", self.bullet_speed),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("mega_speed", self.mega_speed),
            ("mega_image_width", self.mega_image_width),
            ("mega_cell_size", self.mega_cell_size),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        let non_negative = [
            ("fire_delay_ms", self.fire_delay_ms),
            ("play_margin", self.play_margin),
            ("invulnerability_secs", self.invulnerability_secs),
            ("enemy_march_speed", self.enemy_march_speed),
            ("enemy_drop", self.enemy_drop),
            ("mega_gap", self.mega_gap),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        if self.mega_cooldown_ms < 0.0 {
            return Err(TuningError::Invalid {
                field: "mega_cooldown_ms",
                reason: "must not be negative",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        if self.wave_margin_x * 2.0 >= CANVAS_WIDTH {
            return Err(TuningError::Invalid {
                field: "wave_margin_x",
                reason: "formation would not fit on the canvas",
            });
        }
        if self.player_width + self.play_margin * 2.0 > CANVAS_WIDTH {
            return Err(TuningError::Invalid {
                field: "player_width",
                reason: "ship does not fit between the play margins",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 400.0, "kill_reward": 20 }"#).unwrap();
        assert_eq!(tuning.player_speed, 400.0);
        assert_eq!(tuning.kill_reward, 20);
        assert_eq!(tuning.fire_delay_ms, 280.0);
        assert_eq!(tuning.mega_kill_reward, 15);
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = Tuning::from_json(r#"{ "bullet_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "bullet_speed",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "starting_lives": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "starting_lives",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "wave_margin_x": 450.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "wave_margin_x",
                ..
            }
        ));
    }

    #[test]
    fn test_error_message_names_field() {
        let err = Tuning::from_json(r#"{ "fire_delay_ms": -1.0 }"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid tuning value `fire_delay_ms`: must not be negative"
        );
    }
}
