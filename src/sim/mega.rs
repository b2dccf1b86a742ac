//! Mega attack: a cooldown-gated pair of piercing projectiles
//!
//! The cooldown runs on wall-clock time rather than accumulated step time, so
//! it keeps charging while the game is paused. It is modelled as a deadline
//! that every query compares against the caller's clock.

use glam::Vec2;

use super::events::GameEvent;
use super::state::{Projectile, Simulation, SpriteHint};
use crate::assets::AssetKind;

/// Pixel-art stand-in grid size (columns x rows)
pub const MEGA_SPRITE_CELLS: (f32, f32) = (13.0, 12.0);

/// Clamp range for the image-backed projectile width
const IMAGE_WIDTH_RANGE: (f32, f32) = (24.0, 96.0);

/// Readiness of the Mega attack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MegaCharge {
    /// Wall-clock time (ms) at which the charge completes; `None` when ready
    ready_at_ms: Option<f64>,
}

impl MegaCharge {
    pub fn is_ready(&self, now_ms: f64) -> bool {
        self.ready_at_ms.is_none_or(|at| now_ms >= at)
    }

    /// Settle an elapsed deadline. Idempotent.
    pub fn refresh(&mut self, now_ms: f64) {
        if self.ready_at_ms.is_some_and(|at| now_ms >= at) {
            self.ready_at_ms = None;
            log::debug!("Mega charged");
        }
    }

    pub fn start_cooldown(&mut self, now_ms: f64, cooldown_ms: f64) {
        self.ready_at_ms = Some(now_ms + cooldown_ms);
    }

    /// Drop any pending cooldown (session restart)
    pub fn reset(&mut self) {
        self.ready_at_ms = None;
    }
}

/// Fire the Mega attack if it is charged and the game is running.
///
/// Spawns two projectiles symmetric about the ship's centre and starts the
/// cooldown. Returns whether the attack fired.
pub fn try_activate(sim: &mut Simulation, now_ms: f64) -> bool {
    if !sim.is_running() || !sim.mega.is_ready(now_ms) {
        return false;
    }

    let tuning = &sim.tuning;
    let (size, sprite) = match sim.assets.image(AssetKind::MegaProjectile) {
        Some(image) => {
            let width = tuning
                .mega_image_width
                .clamp(IMAGE_WIDTH_RANGE.0, IMAGE_WIDTH_RANGE.1);
            let height = image.height * (width / image.width);
            (Vec2::new(width, height), SpriteHint::Image)
        }
        None => {
            let cell = tuning.mega_cell_size;
            (
                Vec2::new(MEGA_SPRITE_CELLS.0 * cell, MEGA_SPRITE_CELLS.1 * cell),
                SpriteHint::Procedural { cell_size: cell },
            )
        }
    };

    let center_x = sim.player.center_x();
    let half_gap = tuning.mega_gap / 2.0;
    let max_x = (sim.width - size.x).max(0.0);
    let left_x = (center_x - size.x - half_gap).clamp(0.0, max_x);
    let right_x = (center_x + half_gap).clamp(0.0, max_x);
    let y = sim.player.pos.y - size.y - tuning.mega_lift;
    let vy = -tuning.mega_speed;
    let cooldown_ms = tuning.mega_cooldown_ms;

    for x in [left_x, right_x] {
        sim.mega_bullets.push(Projectile {
            pos: Vec2::new(x, y),
            size,
            vy,
            sprite,
        });
    }

    sim.mega.start_cooldown(now_ms, cooldown_ms);
    sim.emit(GameEvent::SpecialAttack);
    log::info!("Mega fired ({:?})", sprite);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    #[test]
    fn test_activate_then_cooldown() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        assert!(try_activate(&mut sim, 0.0));
        assert_eq!(sim.mega_bullets.len(), 2);
        assert!(!sim.mega.is_ready(0.0));
        assert_eq!(sim.pending_events(), &[GameEvent::SpecialAttack]);

        // Immediate retry is a no-op
        assert!(!try_activate(&mut sim, 10.0));
        assert_eq!(sim.mega_bullets.len(), 2);

        // Still charging just before the deadline
        assert!(!try_activate(&mut sim, 4499.0));
        assert!(!sim.mega.is_ready(4499.0));

        // Charged after 4.5s of wall-clock time
        assert!(sim.mega.is_ready(4500.0));
        assert!(try_activate(&mut sim, 4500.0));
        assert_eq!(sim.mega_bullets.len(), 4);
    }

    #[test]
    fn test_procedural_layout() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        assert!(try_activate(&mut sim, 0.0));

        let left = &sim.mega_bullets[0];
        let right = &sim.mega_bullets[1];
        // 13x12 cells at 4px
        assert_eq!(left.size, Vec2::new(52.0, 48.0));
        assert_eq!(left.sprite, SpriteHint::Procedural { cell_size: 4.0 });
        assert_eq!(left.vy, -720.0);

        // Symmetric about the ship centre (400) with a 16px gap
        assert_eq!(left.pos.x, 400.0 - 52.0 - 8.0);
        assert_eq!(right.pos.x, 408.0);
        assert_eq!(left.pos.y, 550.0 - 48.0 - 6.0);
        assert_eq!(left.pos.y, right.pos.y);
    }

    #[test]
    fn test_image_layout() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.assets
            .mark_ready(AssetKind::MegaProjectile, 112.0, 128.0);
        assert!(try_activate(&mut sim, 0.0));

        let left = &sim.mega_bullets[0];
        assert_eq!(left.sprite, SpriteHint::Image);
        assert_eq!(left.size, Vec2::new(56.0, 64.0));
    }

    #[test]
    fn test_projectiles_clamped_to_canvas() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.player.pos.x = 10.0;
        assert!(try_activate(&mut sim, 0.0));
        assert_eq!(sim.mega_bullets[0].pos.x, 0.0);

        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.player.pos.x = 740.0;
        assert!(try_activate(&mut sim, 0.0));
        assert_eq!(sim.mega_bullets[1].pos.x, 800.0 - 52.0);
    }

    #[test]
    fn test_not_running_is_noop() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.phase = GamePhase::Paused;
        assert!(!try_activate(&mut sim, 0.0));
        assert!(sim.mega_bullets.is_empty());
        assert!(sim.mega.is_ready(0.0));

        sim.phase = GamePhase::GameOver;
        assert!(!try_activate(&mut sim, 0.0));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let mut charge = MegaCharge::default();
        charge.start_cooldown(100.0, 4500.0);
        charge.refresh(200.0);
        assert!(!charge.is_ready(200.0));
        charge.refresh(4600.0);
        assert!(charge.is_ready(0.0));
        charge.refresh(4700.0);
        assert!(charge.is_ready(4700.0));

        charge.start_cooldown(0.0, 4500.0);
        charge.reset();
        assert!(charge.is_ready(0.0));
    }
}
