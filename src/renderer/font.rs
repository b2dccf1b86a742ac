//! 8x8 bitmap font for overlay captions

use glam::Vec2;

use super::shapes::push_rect;
use super::vertex::Vertex;
use crate::sim::Rect;

pub const GLYPH_SIZE: usize = 8;

/// Rows of a glyph, most significant bit on the left
fn glyph(c: char) -> Option<[u8; GLYPH_SIZE]> {
    let rows = match c {
        'A' => [0x7C, 0x82, 0x82, 0xFE, 0x82, 0x82, 0x82, 0x00],
        'D' => [0xFC, 0x82, 0x82, 0x82, 0x82, 0x82, 0xFC, 0x00],
        'E' => [0xFE, 0x80, 0x80, 0xFC, 0x80, 0x80, 0xFE, 0x00],
        'G' => [0x7E, 0x80, 0x80, 0x9E, 0x82, 0x82, 0x7E, 0x00],
        'M' => [0x82, 0xC6, 0xAA, 0x92, 0x82, 0x82, 0x82, 0x00],
        'O' => [0x7C, 0x82, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00],
        'P' => [0xFC, 0x82, 0x82, 0xFC, 0x80, 0x80, 0x80, 0x00],
        'R' => [0xFC, 0x82, 0x82, 0xFC, 0xA0, 0x90, 0x88, 0x00],
        'S' => [0x7E, 0x80, 0x80, 0x7C, 0x02, 0x02, 0xFC, 0x00],
        'U' => [0x82, 0x82, 0x82, 0x82, 0x82, 0x82, 0x7C, 0x00],
        'V' => [0x82, 0x82, 0x82, 0x82, 0x44, 0x28, 0x10, 0x00],
        ' ' => [0x00; GLYPH_SIZE],
        _ => return None,
    };
    Some(rows)
}

/// Gap between glyphs, in font pixels
fn spacing(pixel: f32) -> f32 {
    (pixel / 4.0).floor().max(1.0)
}

/// Rendered width of `text` at a given pixel size
pub fn text_width(text: &str, pixel: f32) -> f32 {
    let n = text.chars().count() as f32;
    if n == 0.0 {
        return 0.0;
    }
    n * GLYPH_SIZE as f32 * pixel + (n - 1.0) * spacing(pixel) * pixel
}

/// Largest whole pixel size (1..=15) at which `text` fits the box
pub fn fit_pixel_size(text: &str, max_width: f32, max_height: f32) -> f32 {
    (1..=15)
        .map(|size| size as f32)
        .take_while(|&size| {
            text_width(text, size) <= max_width && GLYPH_SIZE as f32 * size <= max_height
        })
        .last()
        .unwrap_or(1.0)
}

/// Draw `text` centred on `center`, with a drop shadow offset down-right
pub fn push_text(
    out: &mut Vec<Vertex>,
    text: &str,
    center: Vec2,
    pixel: f32,
    color: [f32; 4],
    shadow: Option<(f32, [f32; 4])>,
) {
    let advance = (GLYPH_SIZE as f32 + spacing(pixel)) * pixel;
    let start = Vec2::new(
        center.x - text_width(text, pixel) / 2.0,
        center.y - GLYPH_SIZE as f32 * pixel / 2.0,
    );

    // Shadow first so the face draws over it
    let passes = shadow
        .map(|(offset, shade)| (Vec2::splat(offset), shade))
        .into_iter()
        .chain(std::iter::once((Vec2::ZERO, color)));

    for (offset, tint) in passes {
        for (i, c) in text.chars().enumerate() {
            let Some(rows) = glyph(c) else {
                continue;
            };
            let origin = start + offset + Vec2::new(i as f32 * advance, 0.0);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (0x80 >> col) != 0 {
                        let r = Rect::new(
                            origin.x + col as f32 * pixel,
                            origin.y + row as f32 * pixel,
                            pixel,
                            pixel,
                        );
                        push_rect(out, &r, tint);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_game_over() {
        // Fits a 797x197 box at 9px per font pixel
        let size = fit_pixel_size("GAME OVER", 797.0, 197.0);
        assert_eq!(size, 9.0);
        assert!(text_width("GAME OVER", size) <= 797.0);
        assert!(text_width("GAME OVER", size + 1.0) > 797.0);
    }

    #[test]
    fn test_text_quads() {
        let mut out = Vec::new();
        push_text(&mut out, "O", Vec2::ZERO, 1.0, [1.0; 4], None);
        // 'O' has 5+2+2+2+2+2+5 = 20 lit pixels
        assert_eq!(out.len(), 20 * 6);

        let mut shadowed = Vec::new();
        push_text(
            &mut shadowed,
            "O",
            Vec2::ZERO,
            1.0,
            [1.0; 4],
            Some((3.0, [0.0; 4])),
        );
        assert_eq!(shadowed.len(), 2 * out.len());
    }

    #[test]
    fn test_unknown_glyphs_skipped() {
        let mut out = Vec::new();
        push_text(&mut out, "?", Vec2::ZERO, 2.0, [1.0; 4], None);
        assert!(out.is_empty());
    }
}
