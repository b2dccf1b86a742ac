//! Demo autopilot
//!
//! Produces held controls for attract mode and the headless runner: track the
//! lowest enemy, sidestep incoming fire, keep shooting and fire the Mega
//! whenever it is charged.

use super::state::Simulation;
use super::tick::TickInput;

/// Horizontal slack before the ship bothers to move (px)
const DEADZONE: f32 = 6.0;
/// How far above the ship incoming fire is considered a threat (px)
const THREAT_RANGE: f32 = 140.0;

/// Held controls the autopilot would press this frame
pub fn autopilot_input(sim: &Simulation, now_ms: f64) -> TickInput {
    let mut input = TickInput {
        now_ms,
        ..Default::default()
    };
    if !sim.is_running() {
        return input;
    }

    let ship = sim.player.bounds();
    let center = ship.center().x;

    let threat = sim.enemy_bullets.iter().find(|b| {
        let r = b.bounds();
        r.bottom() >= ship.y - THREAT_RANGE
            && r.y <= ship.bottom()
            && r.right() >= ship.x - DEADZONE
            && r.x <= ship.right() + DEADZONE
    });

    if let Some(bullet) = threat {
        // Step away from the bullet, towards the roomier side near walls
        let dodge_left = bullet.bounds().center().x > center;
        let blocked = if dodge_left {
            ship.x <= sim.tuning.play_margin + DEADZONE
        } else {
            ship.right() >= sim.width - sim.tuning.play_margin - DEADZONE
        };
        let go_left = dodge_left != blocked;
        input.left = go_left;
        input.right = !go_left;
    } else if let Some(target) = lowest_enemy_x(sim, center) {
        input.left = target < center - DEADZONE;
        input.right = target > center + DEADZONE;
    }

    input.fire = true;
    input.special = sim.mega.is_ready(now_ms) && sim.formation.alive_count() > 0;
    input
}

/// Centre x of the lowest alive enemy, nearest to `center` on ties
fn lowest_enemy_x(sim: &Simulation, center: f32) -> Option<f32> {
    sim.formation
        .alive()
        .map(|e| (e.pos.y, e.bounds().center().x))
        .fold(None, |best: Option<(f32, f32)>, (y, x)| match best {
            Some((by, bx)) if by > y || (by == y && (bx - center).abs() <= (x - center).abs()) => {
                Some((by, bx))
            }
            _ => Some((y, x)),
        })
        .map(|(_, x)| x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;
    use crate::sim::state::{GamePhase, Projectile};
    use crate::sim::tick::tick;
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_tracks_lowest_enemy() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        // Only the bottom-left enemy remains
        let target = sim.formation.total() - sim.formation.cols as usize;
        for (i, enemy) in sim.formation.enemies.iter_mut().enumerate() {
            enemy.alive = i == target;
        }
        let input = autopilot_input(&sim, 0.0);
        assert!(input.left);
        assert!(!input.right);
        assert!(input.fire);
        assert!(input.special);
    }

    #[test]
    fn test_dodges_incoming_fire() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        let ship = sim.player.bounds();
        // Bullet just right of centre, 60px above
        sim.enemy_bullets.push(Projectile::new(
            Vec2::new(ship.center().x + 4.0, ship.y - 60.0),
            Vec2::new(4.0, 10.0),
            240.0,
        ));
        let input = autopilot_input(&sim, 0.0);
        assert!(input.left);
        assert!(!input.right);
    }

    #[test]
    fn test_dodge_away_from_wall() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.player.pos.x = sim.tuning.play_margin;
        let ship = sim.player.bounds();
        sim.enemy_bullets.push(Projectile::new(
            Vec2::new(ship.center().x + 4.0, ship.y - 60.0),
            Vec2::new(4.0, 10.0),
            240.0,
        ));
        let input = autopilot_input(&sim, 0.0);
        assert!(input.right);
    }

    #[test]
    fn test_idle_when_not_running() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.phase = GamePhase::Paused;
        let input = autopilot_input(&sim, 42.0);
        assert_eq!(
            input,
            TickInput {
                now_ms: 42.0,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_demo_scores_points() {
        let mut sim = Simulation::new(Tuning::default(), 7);
        let mut rng = seeded(7);
        let mut now = 0.0;
        for _ in 0..600 {
            let input = autopilot_input(&sim, now);
            tick(&mut sim, &input, 1.0 / 60.0, &mut rng);
            now += 1000.0 / 60.0;
        }
        assert!(sim.score > 0);
    }
}
