//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time only advances through `tick`'s `dt` and the supplied wall clock
//! - Gameplay randomness is injected per step
//! - Stable iteration order (formation pool order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod events;
pub mod mega;
pub mod particles;
pub mod rng;
pub mod starfield;
pub mod state;
pub mod tick;
pub mod wave;

pub use autopilot::autopilot_input;
pub use collision::{Rect, overlaps};
pub use events::{DamageCause, GameEvent, Weapon};
pub use mega::{MegaCharge, try_activate};
pub use rng::{RandomSource, seeded};
pub use starfield::{Star, Starfield};
pub use state::{
    Enemy, Formation, GamePhase, Particle, Player, Projectile, Simulation, SpriteHint,
};
pub use tick::{TickInput, damage_player, tick};
pub use wave::{eligible_shooters, fire_interval, generate_wave, speed_multiplier};
