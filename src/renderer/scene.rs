//! Scene assembly
//!
//! Walks the simulation after a step and emits one triangle list in canvas
//! pixels. Pure, so it runs (and is tested) without a GPU.

use glam::Vec2;

use super::font::{fit_pixel_size, push_text};
use super::shapes::{push_glow, push_rect, with_alpha};
use super::sprite::PixelSprite;
use super::vertex::{Vertex, colors};
use crate::assets::AssetKind;
use crate::settings::Settings;
use crate::sim::{Rect, Simulation, SpriteHint};

/// Cannon tip drawn on top of the ship
const CANNON: Vec2 = Vec2::new(6.0, 8.0);
/// Drop-shadow offset of the overlay caption
const CAPTION_SHADOW: f32 = 3.0;
/// Box the game-over caption is fitted into
const CAPTION_BOX: Vec2 = Vec2::new(797.0, 197.0);

/// Drawables the shell could decode from image assets
#[derive(Debug, Clone)]
pub struct SpriteBank {
    pub player: Option<PixelSprite>,
    pub mega: Option<PixelSprite>,
    /// Procedural Mega stand-in
    pub hulk: PixelSprite,
}

impl Default for SpriteBank {
    fn default() -> Self {
        Self {
            player: None,
            mega: None,
            hulk: PixelSprite::hulk(),
        }
    }
}

/// Build the frame's vertices
pub fn build_scene(sim: &Simulation, sprites: &SpriteBank, settings: &Settings) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let (w, h) = (sim.width, sim.height);

    // Nebula
    push_glow(&mut out, Vec2::new(w * 0.2, h * 0.1), 420.0, colors::NEBULA_CYAN, 32);
    push_glow(&mut out, Vec2::new(w * 0.8, h * 0.3), 360.0, colors::NEBULA_PURPLE, 32);

    if settings.starfield {
        for star in &sim.stars.stars {
            let r = Rect::from_pos_size(star.pos, Vec2::splat(star.size));
            push_rect(&mut out, &r, with_alpha(colors::STAR, star.alpha));
        }
    }

    draw_player(&mut out, sim, sprites);

    for enemy in sim.formation.alive() {
        push_rect(&mut out, &enemy.bounds(), enemy.color);
    }

    for bullet in &sim.bullets {
        push_rect(&mut out, &bullet.bounds(), colors::PLAYER_BULLET);
    }

    for mega in &sim.mega_bullets {
        let bounds = mega.bounds();
        push_glow(&mut out, bounds.center(), bounds.w.max(bounds.h), colors::MEGA_GLOW, 16);
        match (mega.sprite, sprites.mega.as_ref()) {
            (SpriteHint::Image, Some(image)) => image.push_stretched(&mut out, &bounds),
            (SpriteHint::Procedural { cell_size }, _) => {
                sprites.hulk.push_cells(&mut out, mega.pos, cell_size)
            }
            // Image tagged but not decoded: stretch the stand-in instead
            (SpriteHint::Image, None) => sprites.hulk.push_stretched(&mut out, &bounds),
            (SpriteHint::Plain, _) => push_rect(&mut out, &bounds, colors::PLAYER_BULLET),
        }
    }

    for bullet in &sim.enemy_bullets {
        push_rect(&mut out, &bullet.bounds(), colors::ENEMY_BULLET);
    }

    for particle in &sim.particles {
        let r = Rect::from_pos_size(
            particle.pos - Vec2::splat(particle.size / 2.0),
            Vec2::splat(particle.size),
        );
        push_rect(&mut out, &r, with_alpha(particle.color, particle.life_fraction()));
    }

    let screen = Rect::new(0.0, 0.0, w, h);
    if settings.flash_enabled() && sim.flash > 0.0 {
        push_rect(&mut out, &screen, with_alpha(colors::FLASH, sim.flash));
    }

    let caption = if sim.hud.game_over {
        Some("GAME OVER")
    } else if sim.hud.paused {
        Some("PAUSED")
    } else {
        None
    };
    if let Some(text) = caption {
        push_rect(&mut out, &screen, colors::OVERLAY);
        let pixel = fit_pixel_size(text, CAPTION_BOX.x.min(w), CAPTION_BOX.y);
        push_text(
            &mut out,
            text,
            Vec2::new(w / 2.0, h / 2.0),
            pixel,
            colors::TITLE,
            Some((CAPTION_SHADOW, colors::TITLE_SHADOW)),
        );
    }

    out
}

fn draw_player(out: &mut Vec<Vertex>, sim: &Simulation, sprites: &SpriteBank) {
    let ship = sim.player.bounds();
    match sprites.player.as_ref() {
        Some(sprite) if sim.assets.is_ready(AssetKind::PlayerShip) => {
            sprite.push_stretched(out, &ship)
        }
        _ => {
            push_rect(out, &ship, colors::PLAYER);
            let tip = Rect::new(
                ship.center().x - CANNON.x / 2.0,
                ship.y - CANNON.y,
                CANNON.x,
                CANNON.y,
            );
            push_rect(out, &tip, colors::PLAYER);
        }
    }
}
