//! WebGPU rendering module
//!
//! The scene is flattened into coloured triangles in canvas pixels; sprites
//! and text are drawn as grids of small quads.

pub mod font;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod sprite;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{SpriteBank, build_scene};
pub use sprite::PixelSprite;
pub use vertex::Vertex;
