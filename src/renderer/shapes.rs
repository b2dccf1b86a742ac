//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Push an axis-aligned filled rectangle (two triangles)
pub fn push_rect(out: &mut Vec<Vertex>, rect: &Rect, color: [f32; 4]) {
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.right(), rect.bottom());

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Push a soft radial blob: opaque-ish centre fading to transparent edge
pub fn push_glow(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let edge = [color[0], color[1], color[2], 0.0];
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            edge,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            edge,
        ));
    }
}

/// Scale a colour's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let mut vertices = Vec::new();
        push_rect(&mut vertices, &Rect::new(10.0, 20.0, 30.0, 5.0), [1.0; 4]);
        assert_eq!(vertices.len(), 6);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 25.0);
    }

    #[test]
    fn test_glow_fades_out() {
        let mut out = Vec::new();
        push_glow(&mut out, Vec2::new(5.0, 5.0), 10.0, [1.0, 0.0, 0.0, 0.5], 8);
        assert_eq!(out.len(), 24);
        assert_eq!(out[0].color[3], 0.5);
        assert_eq!(out[1].color[3], 0.0);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha([1.0, 1.0, 1.0, 0.5], 0.5), [1.0, 1.0, 1.0, 0.25]);
    }
}
