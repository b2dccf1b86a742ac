//! Parallax galaxy background
//!
//! Three layers of stars drift downward at layer-dependent speeds and wrap
//! back to the top. Purely decorative.

use glam::Vec2;

use super::rng::RandomSource;

const LAYERS: u32 = 3;
const STARS_PER_LAYER: usize = 80;

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    /// Downward drift (px/s)
    pub speed: f32,
    pub size: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    pub stars: Vec<Star>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(width: f32, height: f32, rng: &mut dyn RandomSource) -> Self {
        let mut stars = Vec::with_capacity(LAYERS as usize * STARS_PER_LAYER);
        for layer in 0..LAYERS {
            let layer = layer as f32;
            for _ in 0..STARS_PER_LAYER {
                stars.push(Star {
                    pos: Vec2::new(rng.range(0.0, width), rng.range(0.0, height)),
                    speed: 10.0 + layer * 20.0 + rng.range(0.0, 20.0),
                    size: 1.0 + layer * 0.6 + rng.range(0.0, 1.2),
                    alpha: rng.range(0.4, 1.0),
                });
            }
        }
        Self {
            stars,
            width,
            height,
        }
    }

    pub fn update(&mut self, dt: f32, rng: &mut dyn RandomSource) {
        for star in &mut self.stars {
            star.pos.y += star.speed * dt;
            if star.pos.y > self.height + 2.0 {
                star.pos.y = -2.0;
                star.pos.x = rng.range(0.0, self.width);
                star.alpha = rng.range(0.4, 1.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded;

    #[test]
    fn test_layers_populated() {
        let mut rng = seeded(5);
        let field = Starfield::new(800.0, 600.0, &mut rng);
        assert_eq!(field.stars.len(), 240);
        assert!(field.stars.iter().all(|s| {
            (0.0..=800.0).contains(&s.pos.x) && (0.0..=600.0).contains(&s.pos.y)
        }));
        // Back layer is slowest
        assert!(field.stars[..80].iter().all(|s| s.speed < 30.0));
        assert!(field.stars[160..].iter().all(|s| s.speed >= 50.0));
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut rng = seeded(5);
        let mut field = Starfield::new(800.0, 600.0, &mut rng);
        field.stars[0].pos.y = 601.0;
        field.stars[0].speed = 10.0;
        field.update(0.2, &mut rng);
        assert_eq!(field.stars[0].pos.y, -2.0);
    }
}
