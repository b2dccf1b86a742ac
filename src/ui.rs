//! HUD values published after each step
//!
//! The shell mirrors these into DOM elements; the native runner prints them
//! as JSON.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, Simulation};

/// Colour of the Mega label while charged / charging
pub const MEGA_READY_COLOR: &str = "#8aff80";
pub const MEGA_CHARGING_COLOR: &str = "#ffcf66";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub mega_ready: bool,
    pub paused: bool,
    /// Show the game-over overlay
    pub game_over: bool,
}

impl HudSnapshot {
    pub fn capture(sim: &Simulation, now_ms: f64) -> Self {
        Self {
            score: sim.score,
            lives: sim.lives,
            level: sim.level,
            mega_ready: sim.mega.is_ready(now_ms),
            paused: sim.phase == GamePhase::Paused,
            game_over: sim.phase == GamePhase::GameOver,
        }
    }

    pub fn mega_label(&self) -> &'static str {
        if self.mega_ready { "Ready" } else { "Charging" }
    }

    pub fn mega_color(&self) -> &'static str {
        if self.mega_ready {
            MEGA_READY_COLOR
        } else {
            MEGA_CHARGING_COLOR
        }
    }
}
