use crate::{
    error::{Error, Result},
    file,
};
use image::RgbaImage;
use std::{fmt::Write, path::Path};

/// The font sheet is a 16x16 grid of 8x8 glyphs.
pub const SHEET_SIZE: u32 = 128;
pub const GLYPH_SIZE: u32 = 8;
pub const GLYPHS_PER_ROW: u32 = SHEET_SIZE / GLYPH_SIZE;
pub const GLYPH_COUNT: usize = (GLYPHS_PER_ROW * GLYPHS_PER_ROW) as usize;

/// Advance width of every glyph: rightmost non-transparent column + 1, plus
/// one pixel of spacing, capped at the glyph size.
pub fn tile_widths(image: &RgbaImage) -> Result<[u8; GLYPH_COUNT]> {
    if image.dimensions() != (SHEET_SIZE, SHEET_SIZE) {
        return Err(Error::InvalidDimensions {
            expected: SHEET_SIZE,
            width: image.width(),
            height: image.height(),
        });
    }

    let mut widths = [0; GLYPH_COUNT];
    for (i, width) in widths.iter_mut().enumerate() {
        let left = (i as u32 % GLYPHS_PER_ROW) * GLYPH_SIZE;
        let top = (i as u32 / GLYPHS_PER_ROW) * GLYPH_SIZE;

        let inked = (0..GLYPH_SIZE)
            .rev()
            .find(|&x| (0..GLYPH_SIZE).any(|y| image.get_pixel(left + x, top + y).0[3] > 0))
            .map_or(0, |x| x + 1);

        *width = (inked + 1).min(GLYPH_SIZE) as u8;
    }
    Ok(widths)
}

pub fn render_header(widths: &[u8; GLYPH_COUNT]) -> String {
    let mut out = String::from(
        "#ifndef FONT_TILE_WIDTHS_HPP\n\n#define FONT_TILE_WIDTHS_HPP\n\n#include <cstdint>\n\n",
    );
    let _ = writeln!(out, "static const uint8_t font_tile_widths[{GLYPH_COUNT}] = {{");
    for (i, width) in widths.iter().enumerate() {
        let _ = write!(out, " {width},");
        if (i + 1) % GLYPHS_PER_ROW as usize == 0 {
            out.push('\n');
        }
    }
    out.push_str("};\n\n#endif\n");
    out
}

/// Measures the font sheet at `image_path` and writes the width table to `output`.
pub fn generate(image_path: &Path, output: &Path) -> Result<[u8; GLYPH_COUNT]> {
    let image = image::open(image_path)?.to_rgba8();
    let widths = tile_widths(&image)?;
    file::write(render_header(&widths).as_bytes(), output)?;
    Ok(widths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn widths_follow_rightmost_ink() {
        let mut sheet = RgbaImage::new(SHEET_SIZE, SHEET_SIZE);
        // glyph 1: columns 0..=2 inked
        for x in 8..11 {
            sheet.put_pixel(x, 3, INK);
        }
        // glyph 17 (second row): only column 4, faint alpha still counts
        sheet.put_pixel(8 + 4, 8 + 7, Rgba([0, 0, 0, 1]));
        // glyph 255: full width
        for x in 120..128 {
            sheet.put_pixel(x, 127, INK);
        }

        let widths = tile_widths(&sheet).unwrap();
        assert_eq!(widths[0], 1);
        assert_eq!(widths[1], 4);
        assert_eq!(widths[17], 6);
        assert_eq!(widths[255], 8);
    }

    #[test]
    fn wrong_sheet_size_is_rejected() {
        let sheet = RgbaImage::new(64, 128);
        assert!(matches!(
            tile_widths(&sheet),
            Err(Error::InvalidDimensions { width: 64, .. })
        ));
    }

    #[test]
    fn header_layout() {
        let header = render_header(&[8; GLYPH_COUNT]);
        let row = " 8,".repeat(16) + "\n";
        let expected = format!(
            "#ifndef FONT_TILE_WIDTHS_HPP\n\n#define FONT_TILE_WIDTHS_HPP\n\n#include <cstdint>\n\nstatic const uint8_t font_tile_widths[256] = {{\n{}}};\n\n#endif\n",
            row.repeat(16)
        );
        assert_eq!(header, expected);
    }
}
