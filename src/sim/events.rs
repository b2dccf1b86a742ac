//! Side-effect requests raised during a simulation step
//!
//! The step never talks to audio or the DOM directly. It queues events and the
//! driver drains them after the step, routing each one to its collaborator.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Flash raised by a player shot
pub const SHOT_FLASH: f32 = 0.5;
/// Flash raised by a hit on the ship
pub const HIT_FLASH: f32 = 1.0;

/// What damaged the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCause {
    /// Formation body reached the ship (overlap or descended to its row)
    Enemy,
    /// Enemy projectile
    Bullet,
}

/// Which player weapon destroyed an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    Bullet,
    Mega,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player bullet left the muzzle
    BulletFired { muzzle: Vec2 },
    /// Player lost a life
    PlayerHit {
        cause: DamageCause,
        lives_left: u8,
    },
    /// Mega attack launched
    SpecialAttack,
    EnemyDestroyed { weapon: Weapon, at: Vec2 },
    EnemyFired { from: Vec2 },
    /// Formation wiped out; `level` is the level now starting
    WaveCleared { level: u32 },
    GameOver { score: u64, level: u32 },
    Restarted,
}

impl GameEvent {
    /// Screen flash intensity this event raises, if any
    pub fn flash(&self) -> Option<f32> {
        match self {
            GameEvent::BulletFired { .. } => Some(SHOT_FLASH),
            GameEvent::PlayerHit { .. } => Some(HIT_FLASH),
            _ => None,
        }
    }
}
