//! Game state and core simulation types
//!
//! Everything one session needs lives in [`Simulation`]: the ship, the enemy
//! formation, the projectile and particle pools, and the score/lives/level
//! counters. The driver owns exactly one and passes it to [`super::tick`].

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::GameEvent;
use super::mega::MegaCharge;
use super::rng::seeded;
use super::starfield::Starfield;
use super::wave::generate_wave;
use crate::assets::AssetStatus;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::tuning::Tuning;
use crate::ui::HudSnapshot;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by the pause toggle
    Paused,
    /// Lives exhausted; only a restart leaves this phase
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (px/s)
    pub speed: f32,
    /// Time until the next shot is allowed (ms, may go negative)
    pub cooldown_ms: f32,
    pub fire_delay_ms: f32,
    /// Remaining damage immunity (s)
    pub invulnerable_secs: f32,
}

impl Player {
    pub fn new(tuning: &Tuning, canvas_width: f32, y: f32) -> Self {
        let size = Vec2::new(tuning.player_width, tuning.player_height);
        Self {
            pos: Vec2::new(canvas_width / 2.0 - size.x / 2.0, y),
            size,
            speed: tuning.player_speed,
            cooldown_ms: 0.0,
            fire_delay_ms: tuning.fire_delay_ms,
            invulnerable_secs: 0.0,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_secs > 0.0
    }

    pub fn decay_invulnerability(&mut self, dt: f32) {
        self.invulnerable_secs = (self.invulnerable_secs - dt).max(0.0);
    }

    /// Keep the ship inside `[margin, canvas_width - width - margin]`
    pub fn clamp_to_field(&mut self, canvas_width: f32, margin: f32) {
        let max_x = canvas_width - self.size.x - margin;
        self.pos.x = self.pos.x.max(margin).min(max_x);
    }
}

/// One member of the formation
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Dead enemies stay in the pool so indices remain stable
    pub alive: bool,
    pub color: [f32; 4],
    pub row: u32,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// The enemy pool for one wave
///
/// Fixed length for the wave's lifetime: enemies are soft-deleted through
/// their `alive` flag and the whole pool is replaced on wave regeneration.
#[derive(Debug, Clone)]
pub struct Formation {
    pub enemies: Vec<Enemy>,
    /// +1 marching right, -1 marching left
    pub direction: f32,
    pub rows: u32,
    pub cols: u32,
}

impl Formation {
    pub fn total(&self) -> usize {
        self.enemies.len()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn alive_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut().filter(|e| e.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// A wave is cleared once every member is dead
    pub fn is_cleared(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Leftmost x and rightmost right-edge over alive enemies
    pub fn horizontal_extent(&self) -> Option<(f32, f32)> {
        self.alive().fold(None, |acc, e| {
            let (lo, hi) = (e.pos.x, e.pos.x + e.size.x);
            Some(match acc {
                None => (lo, hi),
                Some((min_x, max_x)) => (min_x.min(lo), max_x.max(hi)),
            })
        })
    }
}

/// How the presentation layer should draw a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpriteHint {
    /// Solid rectangle
    Plain,
    /// Draw the loaded image stretched to the bounds
    Image,
    /// Draw the pixel-art stand-in with the given cell size
    Procedural { cell_size: f32 },
}

/// A vertically moving projectile (player, enemy or Mega)
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (px/s, negative = upward)
    pub vy: f32,
    pub sprite: SpriteHint,
}

impl Projectile {
    pub fn new(pos: Vec2, size: Vec2, vy: f32) -> Self {
        Self {
            pos,
            size,
            vy,
            sprite: SpriteHint::Plain,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
    }
}

/// A cosmetic spark
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: [f32; 4],
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Remaining life in 0..=1 (used for fading)
    pub fn life_fraction(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// 1-based level
    pub level: u32,
    pub player: Player,
    pub formation: Formation,
    pub bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub mega_bullets: Vec<Projectile>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub particles_enabled: bool,
    pub stars: Starfield,
    pub mega: MegaCharge,
    pub assets: AssetStatus,
    /// Lift the player row above on-screen touch controls
    pub touch_controls: bool,
    /// Screen flash intensity (0-1), decays each step
    pub flash: f32,
    /// Values published for the HUD at the end of the last step
    pub hud: HudSnapshot,
    /// Seconds since the formation last fired
    pub(crate) enemy_fire_timer: f32,
    /// Seconds since the last bullet-trail emission
    pub(crate) trail_timer: f32,
    /// RNG for cosmetics only; gameplay randomness is injected per step
    pub(crate) fx_rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Simulation {
    /// New session on the default 800x600 canvas
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::with_canvas(tuning, seed, CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    pub fn with_canvas(tuning: Tuning, seed: u64, width: f32, height: f32) -> Self {
        let mut fx_rng = seeded(seed);
        let stars = Starfield::new(width, height, &mut fx_rng);
        let player_y = height - tuning.player_bottom_offset;
        let formation = generate_wave(1, width, &tuning);

        let mut sim = Self {
            player: Player::new(&tuning, width, player_y),
            formation,
            width,
            height,
            phase: GamePhase::Running,
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            mega_bullets: Vec::new(),
            particles: Vec::new(),
            particles_enabled: true,
            stars,
            mega: MegaCharge::default(),
            assets: AssetStatus::default(),
            touch_controls: false,
            flash: 0.0,
            hud: HudSnapshot::default(),
            enemy_fire_timer: 0.0,
            trail_timer: 0.0,
            fx_rng,
            events: Vec::new(),
            tuning,
        };
        // A fresh charge is ready at any clock value
        sim.hud = HudSnapshot::capture(&sim, 0.0);
        sim
    }

    /// Reinitialise the session: counters, pools, wave, ship and Mega charge.
    /// Tuning, assets and layout preferences carry over.
    pub fn restart(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.level = 1;
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.mega_bullets.clear();
        self.particles.clear();
        self.formation = generate_wave(self.level, self.width, &self.tuning);
        self.player = Player::new(&self.tuning, self.width, self.player_row_y());
        self.mega.reset();
        self.flash = 0.0;
        self.enemy_fire_timer = 0.0;
        self.trail_timer = 0.0;
        self.stars = Starfield::new(self.width, self.height, &mut self.fx_rng);
        self.hud = HudSnapshot::capture(self, 0.0);
        self.emit(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    /// Top edge of the ship for the current layout
    pub fn player_row_y(&self) -> f32 {
        let lift = if self.touch_controls {
            self.tuning.touch_ui_margin
        } else {
            0.0
        };
        self.height - self.tuning.player_bottom_offset - lift
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Flip between Running and Paused. No effect once the game is over.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            GamePhase::GameOver => GamePhase::GameOver,
        };
        log::debug!("Pause toggled: {:?}", self.phase);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        if let Some(strength) = event.flash() {
            self.flash = self.flash.max(strength);
        }
        self.events.push(event);
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let sim = Simulation::new(Tuning::default(), 1);
        assert_eq!(sim.phase, GamePhase::Running);
        assert_eq!(sim.score, 0);
        assert_eq!(sim.lives, 3);
        assert_eq!(sim.level, 1);
        assert!(sim.bullets.is_empty());
        assert!(sim.mega.is_ready(0.0));
        // Ship centred on the bottom row
        assert_eq!(sim.player.pos, Vec2::new(375.0, 550.0));
        assert_eq!(sim.formation.total(), 36);
        assert_eq!(sim.formation.alive_count(), 36);
    }

    #[test]
    fn test_touch_controls_lift_player_row() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        assert_eq!(sim.player_row_y(), 550.0);
        sim.touch_controls = true;
        assert_eq!(sim.player_row_y(), 440.0);
    }

    #[test]
    fn test_clamp_to_field() {
        let mut player = Player::new(&Tuning::default(), 800.0, 550.0);
        player.pos.x = -40.0;
        player.clamp_to_field(800.0, 10.0);
        assert_eq!(player.pos.x, 10.0);
        player.pos.x = 900.0;
        player.clamp_to_field(800.0, 10.0);
        assert_eq!(player.pos.x, 740.0);
    }

    #[test]
    fn test_formation_extent_ignores_dead() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        let (min_x, max_x) = sim.formation.horizontal_extent().unwrap();
        assert_eq!(min_x, 60.0);
        assert_eq!(max_x, 768.0);

        // Kill the leftmost column
        let cols = sim.formation.cols as usize;
        for (i, enemy) in sim.formation.enemies.iter_mut().enumerate() {
            if i % cols == 0 {
                enemy.alive = false;
            }
        }
        let (min_x, _) = sim.formation.horizontal_extent().unwrap();
        assert_eq!(min_x, 145.0);

        for enemy in &mut sim.formation.enemies {
            enemy.alive = false;
        }
        assert!(sim.formation.horizontal_extent().is_none());
        assert!(sim.formation.is_cleared());
    }

    #[test]
    fn test_restart_resets_session() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.score = 120;
        sim.lives = 0;
        sim.level = 4;
        sim.phase = GamePhase::GameOver;
        sim.player.pos.x = 12.0;
        sim.bullets
            .push(Projectile::new(Vec2::new(1.0, 1.0), Vec2::new(4.0, 10.0), -520.0));
        sim.mega_bullets
            .push(Projectile::new(Vec2::new(1.0, 1.0), Vec2::new(4.0, 10.0), -720.0));
        sim.formation.enemies[0].alive = false;
        sim.mega.start_cooldown(0.0, 4500.0);

        sim.restart();

        assert_eq!(sim.phase, GamePhase::Running);
        assert_eq!((sim.score, sim.lives, sim.level), (0, 3, 1));
        assert!(sim.bullets.is_empty());
        assert!(sim.mega_bullets.is_empty());
        assert_eq!(sim.formation.alive_count(), sim.formation.total());
        assert_eq!(sim.player.pos.x, 375.0);
        assert!(sim.mega.is_ready(1.0));
        assert_eq!(sim.drain_events(), vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_toggle_pause() {
        let mut sim = Simulation::new(Tuning::default(), 1);
        sim.toggle_pause();
        assert_eq!(sim.phase, GamePhase::Paused);
        sim.toggle_pause();
        assert_eq!(sim.phase, GamePhase::Running);
        sim.phase = GamePhase::GameOver;
        sim.toggle_pause();
        assert_eq!(sim.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_particle_life_fraction() {
        let p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 2.0,
            color: [1.0; 4],
            life: 0.1,
            max_life: 0.4,
        };
        assert!((p.life_fraction() - 0.25).abs() < 1e-6);
    }
}
