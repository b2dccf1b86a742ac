//! Cosmetic sparks: muzzle bursts and bullet trails
//!
//! Particles never touch collision or scoring; a build with them disabled
//! plays identically.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Particle, Simulation};

/// Sparks per muzzle burst
const BURST_COUNT: usize = 6;
/// Seconds between trail emissions behind player bullets
pub const TRAIL_INTERVAL: f32 = 0.03;

const MUZZLE_COLOR: [f32; 4] = [0.54, 1.0, 0.5, 1.0];
const TRAIL_COLOR: [f32; 4] = [0.49, 0.98, 1.0, 0.8];

fn push_capped(sim: &mut Simulation, particle: Particle) {
    if sim.particles_enabled && sim.particles.len() < sim.tuning.max_particles {
        sim.particles.push(particle);
    }
}

/// Fan of sparks thrown upward from the muzzle
pub fn emit_muzzle_burst(sim: &mut Simulation, at: Vec2) {
    for _ in 0..BURST_COUNT {
        let rng = &mut sim.fx_rng;
        let angle = -std::f32::consts::FRAC_PI_2 + rng.range(-0.6, 0.6);
        let speed = rng.range(60.0, 160.0);
        let life = rng.range(0.15, 0.35);
        let size = rng.range(1.5, 3.0);
        let particle = Particle {
            pos: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            size,
            color: MUZZLE_COLOR,
            life,
            max_life: life,
        };
        push_capped(sim, particle);
    }
}

/// Drop a short-lived spark behind every in-flight player bullet
pub fn emit_bullet_trails(sim: &mut Simulation, dt: f32) {
    sim.trail_timer += dt;
    if sim.trail_timer < TRAIL_INTERVAL {
        return;
    }
    sim.trail_timer = 0.0;

    let tails: Vec<Vec2> = sim
        .bullets
        .iter()
        .map(|b| Vec2::new(b.pos.x + b.size.x / 2.0, b.pos.y + b.size.y))
        .collect();
    for tail in tails {
        let drift = sim.fx_rng.range(-20.0, 20.0);
        let life = sim.fx_rng.range(0.12, 0.25);
        push_capped(
            sim,
            Particle {
                pos: tail,
                vel: Vec2::new(drift, 40.0),
                size: 2.0,
                color: TRAIL_COLOR,
                life,
                max_life: life,
            },
        );
    }
}

/// Velocity kept per 1/60 s of flight
const DRAG_PER_FRAME: f32 = 0.96;

/// Integrate and age particles, dropping expired ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    let drag = DRAG_PER_FRAME.powf(dt * 60.0);
    for particle in particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel *= drag;
        particle.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}
