//! Per-frame simulation step
//!
//! Core game loop that advances the session by one display frame. The order
//! of the phases below is part of the game's rules: collision passes mutate
//! state sequentially, so earlier passes win ties.

use glam::Vec2;

use super::collision::overlaps;
use super::events::{DamageCause, GameEvent, Weapon};
use super::mega::try_activate;
use super::particles::{emit_bullet_trails, emit_muzzle_burst, update_particles};
use super::rng::RandomSource;
use super::state::{GamePhase, Projectile, Simulation};
use super::wave::{eligible_shooters, fire_interval, generate_wave, speed_multiplier};
use crate::ui::HudSnapshot;

/// Flash decay per second
const FLASH_DECAY: f32 = 4.0;
/// Gap between a shooter's bottom edge and its bullet
const ENEMY_MUZZLE_GAP: f32 = 2.0;

/// Input snapshot for a single step
///
/// Held controls reflect the state at sampling time; edge-triggered
/// commands are true for exactly one step per press.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Mega attack trigger
    pub special: bool,
    /// Restart button (any phase)
    pub restart: bool,
    /// Confirm key; restarts only from game over
    pub confirm: bool,
    /// Wall-clock time of sampling (ms), drives the Mega cooldown
    pub now_ms: f64,
}

/// Advance the session by `dt` seconds.
///
/// Commands (restart, pause, Mega) are handled first; the simulation phases
/// only run while the game is `Running`. The HUD snapshot is republished at
/// the end of every call, including paused ones, so the Mega label keeps up
/// with the wall clock.
pub fn tick(sim: &mut Simulation, input: &TickInput, dt: f32, rng: &mut dyn RandomSource) {
    sim.mega.refresh(input.now_ms);

    if input.restart || (input.confirm && sim.is_game_over()) {
        sim.restart();
    } else {
        if input.pause {
            sim.toggle_pause();
        }
        if input.special {
            try_activate(sim, input.now_ms);
        }
        if sim.is_running() {
            step(sim, input, dt.max(0.0), rng);
        }
    }

    sim.hud = HudSnapshot::capture(sim, input.now_ms);
}

fn step(sim: &mut Simulation, input: &TickInput, dt: f32, rng: &mut dyn RandomSource) {
    // Layout may have changed (touch controls toggled)
    sim.player.pos.y = sim.player_row_y();

    // 1. Invulnerability decay
    sim.player.decay_invulnerability(dt);

    // 2. Movement: opposing directions cancel
    let mut direction = 0.0;
    if input.left && !input.right {
        direction = -1.0;
    }
    if input.right && !input.left {
        direction = 1.0;
    }
    sim.player.pos.x += direction * sim.player.speed * dt;
    sim.player.clamp_to_field(sim.width, sim.tuning.play_margin);

    // 3. Fire
    sim.player.cooldown_ms -= dt * 1000.0;
    if input.fire && sim.player.cooldown_ms <= 0.0 {
        fire_player_bullet(sim);
    }

    // 4. Projectile integration
    for bullet in sim
        .bullets
        .iter_mut()
        .chain(sim.enemy_bullets.iter_mut())
        .chain(sim.mega_bullets.iter_mut())
    {
        bullet.advance(dt);
    }

    // Cosmetics
    sim.flash = (sim.flash - FLASH_DECAY * dt).max(0.0);
    sim.stars.update(dt, &mut sim.fx_rng);
    emit_bullet_trails(sim, dt);

    // 5. Formation march
    march_formation(sim, dt);

    // 6. Formation vs ship
    if formation_reaches_player(sim) {
        return;
    }

    // 7. Enemy fire
    enemy_fire(sim, dt, rng);

    // 8. Player bullets vs formation (single hit)
    resolve_player_bullets(sim);

    // 9. Mega bullets vs formation (piercing)
    resolve_mega_bullets(sim);

    // 10. Enemy bullets vs ship
    if resolve_enemy_bullets(sim) {
        return;
    }

    // 11. Cull
    cull_offscreen(sim);
    update_particles(&mut sim.particles, dt);

    // 12. Wave clear
    if sim.formation.is_cleared() {
        advance_level(sim);
    }
}

fn fire_player_bullet(sim: &mut Simulation) {
    let tuning = &sim.tuning;
    let size = Vec2::new(tuning.bullet_width, tuning.bullet_height);
    let muzzle = Vec2::new(
        sim.player.center_x() - size.x / 2.0,
        sim.player.pos.y - tuning.muzzle_offset,
    );
    let vy = -tuning.bullet_speed;

    sim.bullets.push(Projectile::new(muzzle, size, vy));
    sim.player.cooldown_ms = sim.player.fire_delay_ms;
    sim.emit(GameEvent::BulletFired { muzzle });
    emit_muzzle_burst(sim, muzzle + Vec2::new(size.x / 2.0, 0.0));
}

/// March sideways; on reaching a margin, reverse and descend instead.
///
/// The reversal is decided on the projected position, so the formation never
/// crosses the margin.
fn march_formation(sim: &mut Simulation, dt: f32) {
    let Some((min_x, max_x)) = sim.formation.horizontal_extent() else {
        return;
    };
    let boost = speed_multiplier(sim.formation.alive_count(), sim.formation.total());
    let dx = sim.formation.direction * sim.tuning.enemy_march_speed * boost * dt;
    let margin = sim.tuning.play_margin;

    if min_x + dx < margin || max_x + dx > sim.width - margin {
        sim.formation.direction = -sim.formation.direction;
        let drop = sim.tuning.enemy_drop;
        for enemy in sim.formation.alive_mut() {
            enemy.pos.y += drop;
        }
    } else {
        for enemy in sim.formation.alive_mut() {
            enemy.pos.x += dx;
        }
    }
}

/// First alive enemy touching the ship, or low enough to reach its row,
/// costs a life and dies. Returns true if that ended the game.
fn formation_reaches_player(sim: &mut Simulation) -> bool {
    let ship = sim.player.bounds();
    let row_y = sim.player.pos.y;
    let contact = sim.formation.enemies.iter().position(|e| {
        let body = e.bounds();
        e.alive && (overlaps(&ship, &body) || body.bottom() >= row_y)
    });

    let Some(index) = contact else {
        return false;
    };
    let game_over = damage_player(sim, DamageCause::Enemy);
    sim.formation.enemies[index].alive = false;
    game_over
}

fn enemy_fire(sim: &mut Simulation, dt: f32, rng: &mut dyn RandomSource) {
    sim.enemy_fire_timer += dt;
    if sim.enemy_fire_timer <= fire_interval(sim.level) || sim.formation.alive_count() == 0 {
        return;
    }
    sim.enemy_fire_timer = 0.0;

    let shooters = eligible_shooters(&sim.formation, sim.level);
    if shooters.is_empty() {
        return;
    }
    let shooter = &sim.formation.enemies[shooters[rng.pick(shooters.len())]];
    let size = Vec2::new(sim.tuning.bullet_width, sim.tuning.bullet_height);
    let from = Vec2::new(
        shooter.pos.x + shooter.size.x / 2.0 - size.x / 2.0,
        shooter.pos.y + shooter.size.y + ENEMY_MUZZLE_GAP,
    );
    let vy = sim.tuning.enemy_bullet_speed;

    sim.enemy_bullets.push(Projectile::new(from, size, vy));
    sim.emit(GameEvent::EnemyFired { from });
    log::debug!("Enemy fired from ({:.0}, {:.0})", from.x, from.y);
}

/// Each bullet kills at most the first alive enemy it overlaps and is consumed
fn resolve_player_bullets(sim: &mut Simulation) {
    let enemies = &mut sim.formation.enemies;
    let mut kills = Vec::new();
    sim.bullets.retain(|bullet| {
        let rect = bullet.bounds();
        match enemies
            .iter_mut()
            .find(|e| e.alive && overlaps(&rect, &e.bounds()))
        {
            Some(enemy) => {
                enemy.alive = false;
                kills.push(enemy.bounds().center());
                false
            }
            None => true,
        }
    });

    for at in kills {
        sim.score += sim.tuning.kill_reward;
        sim.emit(GameEvent::EnemyDestroyed {
            weapon: Weapon::Bullet,
            at,
        });
    }
}

/// Mega bullets pierce: they kill every alive enemy they overlap and survive
fn resolve_mega_bullets(sim: &mut Simulation) {
    let mut kills = Vec::new();
    for mega in &sim.mega_bullets {
        let rect = mega.bounds();
        for enemy in sim.formation.enemies.iter_mut() {
            if enemy.alive && overlaps(&rect, &enemy.bounds()) {
                enemy.alive = false;
                kills.push(enemy.bounds().center());
            }
        }
    }

    for at in kills {
        sim.score += sim.tuning.mega_kill_reward;
        sim.emit(GameEvent::EnemyDestroyed {
            weapon: Weapon::Mega,
            at,
        });
    }
}

/// Returns true if a hit ended the game
fn resolve_enemy_bullets(sim: &mut Simulation) -> bool {
    let ship = sim.player.bounds();
    let mut i = 0;
    while i < sim.enemy_bullets.len() {
        if overlaps(&sim.enemy_bullets[i].bounds(), &ship) {
            sim.enemy_bullets.remove(i);
            if damage_player(sim, DamageCause::Bullet) {
                return true;
            }
        } else {
            i += 1;
        }
    }
    false
}

fn cull_offscreen(sim: &mut Simulation) {
    let tuning = &sim.tuning;
    let enemy_limit = sim.height + tuning.enemy_bullet_cull_margin;
    sim.bullets.retain(|b| b.pos.y >= tuning.bullet_cull_y);
    sim.enemy_bullets.retain(|b| b.pos.y <= enemy_limit);
    sim.mega_bullets.retain(|b| b.pos.y >= tuning.mega_cull_y);
}

/// Next level: clear bullet pools (Mega shots carry over) and regenerate.
/// March direction carries over into the new wave.
fn advance_level(sim: &mut Simulation) {
    sim.level += 1;
    sim.bullets.clear();
    sim.enemy_bullets.clear();

    let direction = sim.formation.direction;
    sim.formation = generate_wave(sim.level, sim.width, &sim.tuning);
    sim.formation.direction = direction;

    sim.emit(GameEvent::WaveCleared { level: sim.level });
    log::info!("Wave cleared, now level {} (score {})", sim.level, sim.score);
}

/// Apply one damage event to the ship.
///
/// Ignored while invulnerable. Otherwise costs a life and starts the grace
/// period; losing the last life ends the game. Returns true if the game is
/// over after this call.
pub fn damage_player(sim: &mut Simulation, cause: DamageCause) -> bool {
    if sim.lives == 0 || sim.phase == GamePhase::GameOver {
        return true;
    }
    if sim.player.is_invulnerable() {
        log::debug!("{:?} damage absorbed by invulnerability", cause);
        return false;
    }

    sim.lives -= 1;
    sim.player.invulnerable_secs = sim.tuning.invulnerability_secs;
    sim.emit(GameEvent::PlayerHit {
        cause,
        lives_left: sim.lives,
    });
    log::debug!("Player hit by {:?}, {} lives left", cause, sim.lives);

    if sim.lives == 0 {
        sim.phase = GamePhase::GameOver;
        sim.emit(GameEvent::GameOver {
            score: sim.score,
            level: sim.level,
        });
        log::info!("Game over: score {} at level {}", sim.score, sim.level);
        return true;
    }
    false
}
