//! Wave generation and the difficulty curve
//!
//! Formation size grows with the level; march speed grows as the formation
//! thins out; the fire rate and the pool of eligible shooters grow with the
//! level.

use glam::Vec2;

use super::state::{Enemy, Formation};
use crate::hsl_to_rgba;
use crate::tuning::Tuning;

/// Formation rows for a level (capped at 7)
pub fn wave_rows(level: u32) -> u32 {
    (4 + level / 2).min(7)
}

/// Formation columns for a level (capped at 14)
pub fn wave_cols(level: u32) -> u32 {
    (8 + level).min(14)
}

/// Build the formation for `level`, spread evenly across the canvas width.
///
/// Geometry is a pure function of level, canvas width and tuning; only the
/// row colour varies with the row index.
pub fn generate_wave(level: u32, canvas_width: f32, tuning: &Tuning) -> Formation {
    let rows = wave_rows(level);
    let cols = wave_cols(level);
    let gap_x = (canvas_width - tuning.wave_margin_x * 2.0) / (cols - 1) as f32;
    let size = Vec2::new(tuning.enemy_width, tuning.enemy_height);

    let mut enemies = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        let color = hsl_to_rgba(120.0 + row as f32 * 30.0, 0.8, 0.6);
        for col in 0..cols {
            enemies.push(Enemy {
                pos: Vec2::new(
                    tuning.wave_margin_x + col as f32 * gap_x,
                    tuning.wave_margin_y + row as f32 * tuning.wave_row_gap,
                ),
                size,
                alive: true,
                color,
                row,
            });
        }
    }

    log::info!("Level {} wave: {} rows x {} cols", level, rows, cols);

    Formation {
        enemies,
        direction: 1.0,
        rows,
        cols,
    }
}

/// March speed multiplier: 1x with a full formation, up to 5x as it thins
pub fn speed_multiplier(alive: usize, total: usize) -> f32 {
    if total == 0 {
        return 1.0;
    }
    let thinned = 1.0 - alive as f32 / total as f32;
    (1.0 + thinned * 4.0).min(5.0)
}

/// Seconds between enemy shots (floor 0.6s)
pub fn fire_interval(level: u32) -> f32 {
    (1.6 - level as f32 * 0.15).max(0.6)
}

/// Every Nth alive enemy may shoot
pub fn shooter_stride(level: u32) -> usize {
    (6 - level.min(6) as i64).max(1) as usize
}

/// Indices (into the formation pool) of enemies eligible to fire this trigger
pub fn eligible_shooters(formation: &Formation, level: u32) -> Vec<usize> {
    let stride = shooter_stride(level);
    formation
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive)
        .map(|(i, _)| i)
        .enumerate()
        .filter(|(alive_index, _)| alive_index % stride == 0)
        .map(|(_, pool_index)| pool_index)
        .collect()
}
