//! Axis-aligned collision detection
//!
//! Every entity in the playfield is an upright rectangle, so a single strict
//! AABB test covers bullets, ships and the formation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from a top-left position and a size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Strict AABB overlap. Rectangles that only share an edge do not collide.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_inside() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));

        // Fully contained
        let inner = Rect::new(2.0, 2.0, 2.0, 2.0);
        assert!(overlaps(&a, &inner));
        assert!(overlaps(&inner, &a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
        assert!(!overlaps(&a, &corner));
    }

    #[test]
    fn test_disjoint() {
        let a = Rect::new(0.0, 0.0, 4.0, 10.0);
        let b = Rect::new(100.0, 100.0, 28.0, 18.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(50.0, 20.0));
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.bottom(), 40.0);
        assert_eq!(r.center(), Vec2::new(35.0, 30.0));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.5f32..100.0, ah in 0.5f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.5f32..100.0, bh in 0.5f32..100.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn rect_overlaps_itself(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 0.5f32..100.0, h in 0.5f32..100.0,
        ) {
            let r = Rect::new(x, y, w, h);
            prop_assert!(overlaps(&r, &r));
        }
    }
}
