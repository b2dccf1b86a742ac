//! Pixel-art sprites
//!
//! The vector renderer has no textures. Loaded images are down-sampled into a
//! grid of coloured cells, and the Mega projectile falls back to a hand-drawn
//! grid when its image is missing.

use glam::Vec2;

use super::shapes::push_rect;
use super::vertex::Vertex;
use crate::sim::Rect;

/// Mega stand-in, 13x12 cells
const HULK_ROWS: [&str; 12] = [
    "   KKKKKKK   ",
    "  KKKKKKKKK  ",
    "  KGGGGGGGK  ",
    " KGGGGGGGGGK ",
    " KGGGEGGEGGK ",
    " KGGGGGGGGGK ",
    "  DGGGGGGGD  ",
    "   DGGGGGD   ",
    "   GGGGGGG   ",
    "  GGGGGGGGG  ",
    "  PPPG GPPP  ",
    "  PPP   PPP  ",
];

fn hulk_color(cell: char) -> Option<[f32; 4]> {
    match cell {
        ' ' => None,
        'D' => Some([0.165, 0.647, 0.165, 1.0]),
        'P' => Some([0.604, 0.424, 1.0, 1.0]),
        'K' => Some([0.106, 0.106, 0.106, 1.0]),
        'E' => Some([1.0, 1.0, 1.0, 1.0]),
        // G and anything unknown
        _ => Some([0.365, 0.89, 0.365, 1.0]),
    }
}

/// Cells with less alpha than this are treated as transparent
const ALPHA_CUTOFF: u8 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct PixelSprite {
    pub cols: usize,
    pub rows: usize,
    /// Row-major, `None` is transparent
    cells: Vec<Option<[f32; 4]>>,
}

impl PixelSprite {
    /// Built-in Mega projectile stand-in
    pub fn hulk() -> Self {
        let cols = HULK_ROWS[0].len();
        let cells = HULK_ROWS
            .iter()
            .flat_map(|row| row.chars().map(hulk_color))
            .collect();
        Self {
            cols,
            rows: HULK_ROWS.len(),
            cells,
        }
    }

    /// Down-sample an RGBA8 image to at most `max_cols` columns.
    ///
    /// Returns `None` if the buffer does not match the dimensions.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8], max_cols: usize) -> Option<Self> {
        if width == 0 || height == 0 || rgba.len() != width * height * 4 || max_cols == 0 {
            return None;
        }
        let cols = width.min(max_cols);
        let rows = ((height * cols) / width).max(1);

        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            let sy = (row * height) / rows;
            for col in 0..cols {
                let sx = (col * width) / cols;
                let i = (sy * width + sx) * 4;
                let px = &rgba[i..i + 4];
                cells.push((px[3] >= ALPHA_CUTOFF).then(|| {
                    [
                        px[0] as f32 / 255.0,
                        px[1] as f32 / 255.0,
                        px[2] as f32 / 255.0,
                        px[3] as f32 / 255.0,
                    ]
                }));
            }
        }
        Some(Self { cols, rows, cells })
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<[f32; 4]> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row * self.cols + col]
    }

    /// Draw with square cells of `cell_size` starting at `origin`
    pub fn push_cells(&self, out: &mut Vec<Vertex>, origin: Vec2, cell_size: f32) {
        self.push_scaled(out, origin, Vec2::splat(cell_size));
    }

    /// Draw stretched to fill `bounds`
    pub fn push_stretched(&self, out: &mut Vec<Vertex>, bounds: &Rect) {
        let cell = Vec2::new(bounds.w / self.cols as f32, bounds.h / self.rows as f32);
        self.push_scaled(out, Vec2::new(bounds.x, bounds.y), cell);
    }

    fn push_scaled(&self, out: &mut Vec<Vertex>, origin: Vec2, cell: Vec2) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(color) = self.cell(col, row) {
                    let r = Rect::new(
                        origin.x + col as f32 * cell.x,
                        origin.y + row as f32 * cell.y,
                        cell.x,
                        cell.y,
                    );
                    push_rect(out, &r, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mega::MEGA_SPRITE_CELLS;

    #[test]
    fn test_hulk_matches_projectile_grid() {
        let hulk = PixelSprite::hulk();
        assert_eq!(hulk.cols as f32, MEGA_SPRITE_CELLS.0);
        assert_eq!(hulk.rows as f32, MEGA_SPRITE_CELLS.1);
        assert_eq!(hulk.cell(0, 0), None);
        assert_eq!(hulk.cell(3, 0), hulk_color('K'));
        assert_eq!(hulk.cell(5, 4), Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(hulk.cell(99, 0), None);
    }

    #[test]
    fn test_from_rgba_downsamples() {
        // 4x2 image: left half opaque red, right half transparent
        let mut rgba = Vec::new();
        for _ in 0..2 {
            rgba.extend_from_slice(&[255, 0, 0, 255, 255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0]);
        }
        let sprite = PixelSprite::from_rgba(4, 2, &rgba, 2).unwrap();
        assert_eq!((sprite.cols, sprite.rows), (2, 1));
        assert_eq!(sprite.cell(0, 0), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(sprite.cell(1, 0), None);

        assert!(PixelSprite::from_rgba(4, 2, &rgba[..8], 2).is_none());
    }

    #[test]
    fn test_stretched_fills_bounds() {
        let hulk = PixelSprite::hulk();
        let mut out = Vec::new();
        hulk.push_stretched(&mut out, &Rect::new(0.0, 0.0, 26.0, 24.0));
        let max_x = out.iter().map(|v| v.position[0]).fold(0.0, f32::max);
        let max_y = out.iter().map(|v| v.position[1]).fold(0.0, f32::max);
        assert!(max_x <= 26.0);
        assert!(max_y <= 24.0);
        assert_eq!(out.len() % 6, 0);
    }
}
