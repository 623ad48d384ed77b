pub use kurbo::{Point, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Straight-alpha RGBA8 color.
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from all four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Premultiplied `[r, g, b, a]` bytes for buffer compositing.
    pub fn premul(self) -> [u8; 4] {
        let a16 = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a16) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Catalog color scheme.
pub struct Palette {
    /// Page background.
    pub background: Rgba8,
    /// Label text color.
    pub ink: Rgba8,
    /// Accent used for the name box and thumbnail rings.
    pub accent: Rgba8,
    /// Primary tone of the synthesized text mark.
    pub mark_primary: Rgba8,
    /// Secondary tone of the synthesized text mark.
    pub mark_secondary: Rgba8,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba8::rgb(255, 255, 255),
            ink: Rgba8::rgb(0, 0, 0),
            accent: Rgba8::rgb(137, 213, 201),
            mark_primary: Rgba8::rgb(255, 150, 150),
            mark_secondary: Rgba8::rgb(100, 180, 180),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Text of the synthesized brand mark, used when no mark bitmap resolves.
pub struct BrandTheme {
    /// First mark line, rendered in the primary tone.
    pub title: String,
    /// Second mark line, rendered in the secondary tone.
    pub subtitle: String,
    /// Small line under the mark, rendered in the primary tone.
    pub tagline: String,
}

impl Default for BrandTheme {
    fn default() -> Self {
        Self {
            title: "Mias".to_string(),
            subtitle: "MODA".to_string(),
            tagline: "HECHO EN COLOMBIA".to_string(),
        }
    }
}

/// One placed thumbnail slot on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbSlot {
    /// Thumbnail diameter in pixels.
    pub diameter: u32,
    /// Left edge of the slot.
    pub x: u32,
    /// Top edge of the slot.
    pub y: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Fixed page layout.
///
/// Constructed once and passed into the composer; geometry is never derived
/// from input data, so identical groups always produce identical pages.
pub struct PageGeometry {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    /// Fraction of the page width covered by the hero image.
    pub hero_width_ratio: f64,
    /// Thumbnail diameter in single-column mode.
    pub column_diameter: u32,
    /// Vertical gap between column thumbnails.
    pub column_gap: u32,
    /// Thumbnail diameter in grid mode.
    pub grid_diameter: u32,
    /// Gap between grid thumbnails, both axes.
    pub grid_gap: u32,
    /// Number of grid columns.
    pub grid_columns: u32,
    /// Largest thumbnail count still laid out as a single column.
    pub column_max: usize,
    /// Thumbnail capacity; detail shots past this rank are dropped.
    pub max_thumbs: usize,
    /// Distance from the page's right edge to the thumbnails.
    pub thumb_right_margin: u32,
    /// Top edge of the first thumbnail row.
    pub thumb_start_y: u32,
    /// Stroke width of the thumbnail ring.
    pub ring_width: u32,
    /// Distance from the page's right edge to the brand mark.
    pub mark_right_margin: u32,
    /// Top edge of the brand mark.
    pub mark_top: u32,
    /// Nominal width of the synthesized text mark block.
    pub mark_block_width: u32,
    /// Font size of the synthesized mark's title and subtitle.
    pub mark_title_px: f32,
    /// Font size of the synthesized mark's tagline.
    pub mark_tagline_px: f32,
    /// Top-left corner of the name box.
    pub name_box_origin: Point,
    /// Padding between label text and its box on every side.
    pub label_pad: f64,
    /// Label font size.
    pub label_font_px: f32,
    /// Fixed price box.
    pub price_box: Rect,
    /// Left inset of the price text within its box.
    pub price_text_inset: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_width: 2000,
            page_height: 2500,
            hero_width_ratio: 0.65,
            column_diameter: 402,
            column_gap: 50,
            grid_diameter: 280,
            grid_gap: 40,
            grid_columns: 2,
            column_max: 2,
            max_thumbs: 4,
            thumb_right_margin: 100,
            thumb_start_y: 600,
            ring_width: 3,
            mark_right_margin: 100,
            mark_top: 20,
            mark_block_width: 400,
            mark_title_px: 100.0,
            mark_tagline_px: 30.0,
            name_box_origin: Point::new(100.0, 2280.0),
            label_pad: 20.0,
            label_font_px: 80.0,
            price_box: Rect::new(220.0, 2390.0, 520.0, 2470.0),
            price_text_inset: 10.0,
        }
    }
}

impl PageGeometry {
    /// Hero region: left-hand block at the origin, full page height.
    pub fn hero_rect(&self) -> Rect {
        let w = (f64::from(self.page_width) * self.hero_width_ratio).round();
        Rect::new(0.0, 0.0, w, f64::from(self.page_height))
    }

    /// Hero region size in whole pixels.
    pub fn hero_size(&self) -> (u32, u32) {
        let r = self.hero_rect();
        (r.width() as u32, r.height() as u32)
    }

    /// Slot for every rendered thumbnail, in rank order.
    ///
    /// Up to [`Self::column_max`] thumbnails stack in a single right-aligned
    /// column; past that they move to a tighter grid so the full capacity
    /// fits beside the hero. `count` is clamped to [`Self::max_thumbs`].
    pub fn thumb_slots(&self, count: usize) -> Vec<ThumbSlot> {
        let n = count.min(self.max_thumbs);
        if n <= self.column_max {
            let d = self.column_diameter;
            let x = self.page_width.saturating_sub(d + self.thumb_right_margin);
            return (0..n)
                .map(|i| ThumbSlot {
                    diameter: d,
                    x,
                    y: self.thumb_start_y + i as u32 * (d + self.column_gap),
                })
                .collect();
        }

        let d = self.grid_diameter;
        let cols = self.grid_columns.max(1);
        (0..n)
            .map(|i| {
                let col = i as u32 % cols;
                let row = i as u32 / cols;
                let from_right = (cols - col) * d + (cols - 1 - col) * self.grid_gap;
                ThumbSlot {
                    diameter: d,
                    x: self
                        .page_width
                        .saturating_sub(self.thumb_right_margin + from_right),
                    y: self.thumb_start_y + row * (d + self.grid_gap),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premul_scales_channels() {
        let c = Rgba8::rgba(100, 50, 200, 128);
        assert_eq!(
            c.premul(),
            [
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128
            ]
        );
        assert_eq!(Rgba8::rgb(9, 9, 9).premul(), [9, 9, 9, 255]);
    }

    #[test]
    fn hero_rect_covers_left_block() {
        let g = PageGeometry::default();
        assert_eq!(g.hero_size(), (1300, 2500));
        assert_eq!(g.hero_rect().origin(), Point::ZERO);
    }

    #[test]
    fn two_thumbs_stack_in_one_column() {
        let g = PageGeometry::default();
        let slots = g.thumb_slots(2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], ThumbSlot { diameter: 402, x: 1498, y: 600 });
        assert_eq!(slots[1], ThumbSlot { diameter: 402, x: 1498, y: 1052 });
    }

    #[test]
    fn four_thumbs_form_a_grid() {
        let g = PageGeometry::default();
        let slots = g.thumb_slots(4);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], ThumbSlot { diameter: 280, x: 1300, y: 600 });
        assert_eq!(slots[1], ThumbSlot { diameter: 280, x: 1620, y: 600 });
        assert_eq!(slots[2], ThumbSlot { diameter: 280, x: 1300, y: 920 });
        assert_eq!(slots[3], ThumbSlot { diameter: 280, x: 1620, y: 920 });
    }

    #[test]
    fn slot_count_is_capped_and_slots_stay_on_page() {
        let g = PageGeometry::default();
        let slots = g.thumb_slots(9);
        assert_eq!(slots.len(), g.max_thumbs);
        for s in slots {
            assert!(s.x + s.diameter <= g.page_width);
            assert!(s.y + s.diameter <= g.page_height);
        }
    }
}
