use std::path::{Path, PathBuf};

use crate::foundation::error::{LookbookError, LookbookResult};
use crate::foundation::geometry::Rgba8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Outcome of the font resolution chain.
#[derive(Clone)]
pub enum ResolvedFont {
    /// Raw bytes of a TrueType/OpenType font file.
    Bytes(Vec<u8>),
    /// No usable font anywhere; text renders through the built-in
    /// fixed-grid glyph renderer.
    Builtin,
}

impl std::fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

const SYSTEM_FONT_FILES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/System/Library/Fonts",
    "C:\\Windows\\Fonts",
];

/// Resolve label font bytes through the ordered fallback chain: bundled
/// assets directory, well-known system font files, then a shallow scan of
/// system font directories. Every strategy is isolated; a failure only moves
/// resolution to the next entry, and exhausting the chain selects the
/// built-in glyph renderer so text always renders.
pub fn resolve_font(assets_dir: Option<&Path>) -> ResolvedFont {
    if let Some(dir) = assets_dir
        && let Some((path, bytes)) = first_font_in_dir(dir, 1)
    {
        tracing::info!(font = %path.display(), "using bundled font");
        return ResolvedFont::Bytes(bytes);
    }

    for file in SYSTEM_FONT_FILES {
        if let Ok(bytes) = std::fs::read(file) {
            tracing::info!(font = %file, "using system font");
            return ResolvedFont::Bytes(bytes);
        }
    }

    for dir in SYSTEM_FONT_DIRS {
        if let Some((path, bytes)) = first_font_in_dir(Path::new(dir), 2) {
            tracing::info!(font = %path.display(), "using discovered system font");
            return ResolvedFont::Bytes(bytes);
        }
    }

    tracing::warn!("no usable font found; labels use the built-in glyph renderer");
    ResolvedFont::Builtin
}

/// First readable font file under `dir` in sorted order, descending at most
/// `depth` directory levels.
fn first_font_in_dir(dir: &Path, depth: u32) -> Option<(PathBuf, Vec<u8>)> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    paths.sort();

    for path in &paths {
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if FONT_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
            && let Ok(bytes) = std::fs::read(path)
        {
            return Some((path.clone(), bytes));
        }
    }

    if depth > 0 {
        for path in &paths {
            if path.is_dir()
                && let Some(found) = first_font_in_dir(path, depth - 1)
            {
                return Some(found);
            }
        }
    }

    None
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out plain text using provided font bytes and styling.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> LookbookResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LookbookError::compose("text size_px must be finite and > 0"));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            LookbookError::compose("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| LookbookError::compose("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(layout)
    }
}

#[derive(Clone, Debug)]
/// Rendered text as a premultiplied RGBA8 tile, transparent outside glyphs.
pub struct TextRaster {
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in pixels.
    pub height: u32,
    /// Premultiplied pixel bytes, row-major.
    pub rgba8_premul: Vec<u8>,
}

/// Measures and rasterizes label text with whatever the resolution chain
/// produced. Shaping failures demote the painter to the built-in renderer;
/// they never surface to page composition.
pub struct TextPainter {
    engine: TextLayoutEngine,
    font: ResolvedFont,
    font_data: Option<vello_cpu::peniko::FontData>,
}

impl TextPainter {
    /// Build a painter for the given assets directory, running the font
    /// resolution chain and validating the result once up front.
    pub fn new(assets_dir: Option<&Path>) -> Self {
        let mut painter = Self {
            engine: TextLayoutEngine::new(),
            font: resolve_font(assets_dir),
            font_data: None,
        };
        painter.probe();
        painter
    }

    /// Validate resolved font bytes with a one-off shaping pass so later
    /// label draws cannot fail on a bad font.
    fn probe(&mut self) {
        let ResolvedFont::Bytes(bytes) = &self.font else {
            return;
        };
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        match self
            .engine
            .layout_plain("Ag", bytes, 16.0, TextBrushRgba8::default())
        {
            Ok(_) => self.font_data = Some(data),
            Err(err) => {
                tracing::warn!(error = %err, "resolved font failed to shape; using built-in glyph renderer");
                self.font = ResolvedFont::Builtin;
            }
        }
    }

    /// Bounding size of `text` at `size_px`.
    pub fn measure(&mut self, text: &str, size_px: f32) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        match self.layout(text, size_px, TextBrushRgba8::default()) {
            Some(layout) => layout_size(&layout),
            None => builtin::measure(text, size_px),
        }
    }

    /// Rasterize `text` into a transparent tile. Returns `None` for empty
    /// text.
    pub fn raster(&mut self, text: &str, size_px: f32, color: Rgba8) -> Option<TextRaster> {
        if text.is_empty() {
            return None;
        }
        let Some(layout) = self.layout(text, size_px, TextBrushRgba8::from(color)) else {
            return Some(builtin::raster(text, size_px, color));
        };
        let Some(font_data) = self.font_data.clone() else {
            return Some(builtin::raster(text, size_px, color));
        };

        // Pixmap dimensions are u16; label tiles are far below that, but
        // clamp instead of trusting arithmetic on arbitrary input text.
        let (text_w, text_h) = layout_size(&layout);
        let width = (text_w.ceil() as u32 + 2).clamp(1, u32::from(u16::MAX));
        let height = (text_h.ceil() as u32 + 2).clamp(1, u32::from(u16::MAX));

        let mut ctx = vello_cpu::RenderContext::new(width as u16, height as u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(width as u16, height as u16);
        pixmap.data_as_u8_slice_mut().fill(0);
        ctx.render_to_pixmap(&mut pixmap);

        Some(TextRaster {
            width,
            height,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        let ResolvedFont::Bytes(bytes) = &self.font else {
            return None;
        };
        match self.engine.layout_plain(text, bytes, size_px, brush) {
            Ok(layout) => Some(layout),
            Err(err) => {
                tracing::warn!(error = %err, "text layout failed; using built-in glyph renderer");
                None
            }
        }
    }
}

/// Bounding size of a shaped layout: widest line advance by summed line
/// heights.
fn layout_size(layout: &parley::Layout<TextBrushRgba8>) -> (f64, f64) {
    let mut w = 0.0f64;
    let mut h = 0.0f64;
    for line in layout.lines() {
        let m = line.metrics();
        w = w.max(f64::from(m.advance));
        h += f64::from(m.ascent + m.descent + m.leading);
    }
    (w, h)
}

/// Fixed 5x7 glyph renderer of last resort.
///
/// Covers uppercase Latin letters, digits, and the punctuation that appears
/// in price labels; lowercase maps to uppercase, anything else renders as a
/// hollow box. Glyphs scale by whole pixel blocks so output stays crisp and
/// deterministic.
pub mod builtin {
    use super::TextRaster;
    use crate::foundation::geometry::Rgba8;

    const GLYPH_WIDTH: u32 = 5;
    const GLYPH_HEIGHT: u32 = 7;
    /// Glyph cell plus one column of spacing.
    const GLYPH_ADVANCE: u32 = 6;

    fn scale_for(size_px: f32) -> u32 {
        ((size_px / GLYPH_HEIGHT as f32).round() as u32).max(1)
    }

    /// Bounding size of `text` at `size_px`.
    pub fn measure(text: &str, size_px: f32) -> (f64, f64) {
        let n = text.chars().count() as u32;
        if n == 0 {
            return (0.0, 0.0);
        }
        let s = scale_for(size_px);
        (
            f64::from((n * GLYPH_ADVANCE - 1) * s),
            f64::from(GLYPH_HEIGHT * s),
        )
    }

    /// Rasterize `text` into a premultiplied tile sized by [`measure`].
    pub fn raster(text: &str, size_px: f32, color: Rgba8) -> TextRaster {
        let s = scale_for(size_px);
        let (w, h) = measure(text, size_px);
        let width = (w as u32).max(1);
        let height = (h as u32).max(1);
        let px = color.premul();
        let mut data = vec![0u8; width as usize * height as usize * 4];

        for (i, ch) in text.chars().enumerate() {
            let base_x = i as u32 * GLYPH_ADVANCE * s;
            let rows = glyph_rows(ch);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    fill_block(
                        &mut data,
                        width,
                        height,
                        base_x + col * s,
                        row as u32 * s,
                        s,
                        px,
                    );
                }
            }
        }

        TextRaster {
            width,
            height,
            rgba8_premul: data,
        }
    }

    fn fill_block(data: &mut [u8], width: u32, height: u32, x0: u32, y0: u32, s: u32, px: [u8; 4]) {
        for y in y0..(y0 + s).min(height) {
            for x in x0..(x0 + s).min(width) {
                let idx = (y as usize * width as usize + x as usize) * 4;
                data[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    fn glyph_rows(c: char) -> [u8; 7] {
        match c.to_ascii_uppercase() {
            ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
            '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
            ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
            '/' => [0x01, 0x01, 0x02, 0x04, 0x08, 0x10, 0x10],
            '$' => [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04],
            '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
            '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
            '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
            '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
            '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
            '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
            '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
            '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
            '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
            '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
            '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
            'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
            'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
            'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
            'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
            'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
            'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
            'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
            'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
            'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
            'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
            'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
            'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
            'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
            'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
            'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
            'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
            'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
            'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
            'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
            'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
            'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
            'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
            'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
            'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
            _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_measure_is_deterministic() {
        let a = builtin::measure("$29.990", 80.0);
        let b = builtin::measure("$29.990", 80.0);
        assert_eq!(a, b);
        assert!(a.0 > 0.0 && a.1 > 0.0);
        assert_eq!(builtin::measure("", 80.0), (0.0, 0.0));
    }

    #[test]
    fn builtin_raster_matches_measure_and_stays_in_bounds() {
        let (w, h) = builtin::measure("ABC", 35.0);
        let tile = builtin::raster("ABC", 35.0, Rgba8::rgb(10, 20, 30));
        assert_eq!(tile.width, w as u32);
        assert_eq!(tile.height, h as u32);
        assert_eq!(
            tile.rgba8_premul.len(),
            tile.width as usize * tile.height as usize * 4
        );
        // Some pixels are inked, none outside the buffer (len check above).
        assert!(tile.rgba8_premul.chunks_exact(4).any(|px| px[3] == 255));
    }

    #[test]
    fn builtin_scale_tracks_font_size() {
        let small = builtin::measure("M", 7.0);
        let large = builtin::measure("M", 70.0);
        assert!(large.0 >= small.0 * 9.0);
    }

    #[test]
    fn painter_empty_text_is_a_noop() {
        let mut painter = TextPainter::new(None);
        assert_eq!(painter.measure("", 80.0), (0.0, 0.0));
        assert!(painter.raster("", 80.0, Rgba8::rgb(0, 0, 0)).is_none());
    }

    #[test]
    fn painter_always_produces_ink() {
        // Regardless of which chain entry resolved (or none), label text
        // must rasterize to something visible.
        let mut painter = TextPainter::new(None);
        let tile = painter.raster("$19.990", 80.0, Rgba8::rgb(0, 0, 0)).unwrap();
        assert!(tile.width > 0 && tile.height > 0);
        assert!(tile.rgba8_premul.chunks_exact(4).any(|px| px[3] > 0));
    }

    #[test]
    fn bundled_scan_picks_the_first_font_in_sorted_order() {
        let dir = std::path::PathBuf::from("target").join("font_tests/sorted");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.ttf"), b"bbb").unwrap();
        std::fs::write(dir.join("a.TTF"), b"aaa").unwrap();
        std::fs::write(dir.join("readme.txt"), b"not a font").unwrap();

        let (path, bytes) = first_font_in_dir(&dir, 1).unwrap();
        assert!(path.ends_with("a.TTF"));
        assert_eq!(bytes, b"aaa");
    }

    #[test]
    fn bad_bundled_font_demotes_to_builtin_without_error() {
        // The bundled strategy wins with garbage bytes; the probe then
        // demotes the painter, and labels still render.
        let dir = std::path::PathBuf::from("target").join("font_tests/garbage");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("broken.ttf"), b"not a real font").unwrap();

        let mut painter = TextPainter::new(Some(&dir));
        let tile = painter.raster("SALE", 40.0, Rgba8::rgb(0, 0, 0)).unwrap();
        assert!(tile.rgba8_premul.chunks_exact(4).any(|px| px[3] > 0));
    }
}
