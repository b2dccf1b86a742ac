//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keys and touch buttons latched into per-step snapshots)
//! - Frame timing

pub mod input;
pub mod time;

pub use input::{InputLatch, Key, map_key};
pub use time::FrameClock;
