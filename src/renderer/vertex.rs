//! Vertex type for the canvas-space triangle list

use bytemuck::{Pod, Zeroable};

/// 2D vertex: position in canvas pixels (y down) and linear RGBA
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Palette, converted from the page's CSS colours
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PLAYER: [f32; 4] = [0.494, 0.976, 1.0, 1.0]; // #7ef9ff
    pub const PLAYER_BULLET: [f32; 4] = [0.541, 1.0, 0.502, 1.0]; // #8aff80
    pub const ENEMY_BULLET: [f32; 4] = [1.0, 0.365, 0.451, 1.0]; // #ff5d73
    pub const STAR: [f32; 4] = [0.91, 0.941, 1.0, 1.0]; // #e8f0ff
    pub const MEGA_GLOW: [f32; 4] = [0.541, 1.0, 0.502, 0.18];
    pub const NEBULA_CYAN: [f32; 4] = [0.494, 0.976, 1.0, 0.08];
    pub const NEBULA_PURPLE: [f32; 4] = [0.604, 0.424, 1.0, 0.10];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.7];
    pub const FLASH: [f32; 4] = [1.0, 1.0, 1.0, 0.35];
    pub const TITLE: [f32; 4] = [1.0, 0.831, 0.278, 1.0]; // #ffd447
    pub const TITLE_SHADOW: [f32; 4] = [1.0, 0.176, 0.333, 1.0]; // #ff2d55
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes[1].offset, 8);
    }
}
