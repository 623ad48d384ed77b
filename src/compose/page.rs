use std::path::Path;

use image::imageops::FilterType;
use kurbo::{Point, Rect};

use crate::assets::decode::decode_image_file;
use crate::assets::font::TextPainter;
use crate::assets::mark::{BrandMark, resolve_brand_mark};
use crate::catalog::group::{ProductGroup, ProductIdentity};
use crate::compose::blit;
use crate::compose::thumb::{Ring, circular_thumbnail};
use crate::foundation::error::LookbookResult;
use crate::foundation::geometry::{BrandTheme, PageGeometry, Palette, Rgba8};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One composed catalog page as an opaque premultiplied RGBA8 raster.
pub struct PageSurface {
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Premultiplied pixel bytes, row-major.
    pub data: Vec<u8>,
}

impl PageSurface {
    /// Drop the alpha channel for JPEG encoding. The page is composited onto
    /// an opaque background, so alpha is 255 everywhere and premultiplied
    /// channels equal straight RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
        rgb
    }
}

/// Lays product groups out on the fixed page canvas.
///
/// Construction runs the brand-mark and font resolution chains once; a
/// missing mark or font only selects a fallback renderer and never fails.
/// Composition itself performs no file writes — only reads of the group's
/// source images, whose decode failures propagate to the caller as a
/// failure for the whole page.
pub struct PageComposer {
    geometry: PageGeometry,
    palette: Palette,
    theme: BrandTheme,
    painter: TextPainter,
    mark: BrandMark,
}

impl PageComposer {
    /// Build a composer for fixed `geometry`, colors, and mark text, loading
    /// optional assets (brand mark bitmap, bundled font) from `assets_dir`.
    pub fn new(
        geometry: PageGeometry,
        palette: Palette,
        theme: BrandTheme,
        assets_dir: Option<&Path>,
    ) -> Self {
        Self {
            painter: TextPainter::new(assets_dir),
            mark: resolve_brand_mark(assets_dir),
            geometry,
            palette,
            theme,
        }
    }

    /// Compose one catalog page for `group`.
    #[tracing::instrument(skip(self, group), fields(product = %group.identity.name))]
    pub fn compose(&mut self, group: &ProductGroup) -> LookbookResult<PageSurface> {
        let width = self.geometry.page_width;
        let height = self.geometry.page_height;
        let mut data = vec![0u8; width as usize * height as usize * 4];
        blit::fill(&mut data, self.palette.background.premul());

        if let Some(hero) = group.hero() {
            self.draw_hero(&mut data, &hero.source_path)?;
        }
        self.draw_thumbnails(&mut data, group)?;
        self.draw_mark(&mut data);
        self.draw_labels(&mut data, &group.identity);

        Ok(PageSurface {
            width,
            height,
            data,
        })
    }

    /// Full-height stretch of the hero photo into the left-hand block. The
    /// stretch is deliberately not aspect-preserving.
    fn draw_hero(&self, data: &mut [u8], path: &Path) -> LookbookResult<()> {
        let img = decode_image_file(path)?;
        let (hero_w, hero_h) = self.geometry.hero_size();
        let resized = image::imageops::resize(&img, hero_w, hero_h, FilterType::Lanczos3);
        let mut bytes = resized.into_raw();
        blit::premultiply_rgba8_in_place(&mut bytes);
        blit::copy_at(
            data,
            self.geometry.page_width,
            self.geometry.page_height,
            &bytes,
            hero_w,
            hero_h,
            0,
            0,
        );
        Ok(())
    }

    /// Circular detail thumbnails for ranks past the hero, up to capacity.
    /// Shots beyond the capacity are dropped, not an error.
    fn draw_thumbnails(&self, data: &mut [u8], group: &ProductGroup) -> LookbookResult<()> {
        let details = group.detail_shots();
        if details.is_empty() {
            return Ok(());
        }

        let shown = &details[..details.len().min(self.geometry.max_thumbs)];
        if shown.len() < details.len() {
            tracing::debug!(
                dropped = details.len() - shown.len(),
                "thumbnail capacity reached"
            );
        }

        let ring = Ring {
            color: self.palette.accent,
            width: self.geometry.ring_width,
        };
        let slots = self.geometry.thumb_slots(shown.len());
        for (img, slot) in shown.iter().zip(&slots) {
            let src = decode_image_file(&img.source_path)?;
            let thumb = circular_thumbnail(&src, slot.diameter, Some(ring))?;
            let mut bytes = thumb.into_raw();
            blit::premultiply_rgba8_in_place(&mut bytes);
            blit::over_at(
                data,
                self.geometry.page_width,
                self.geometry.page_height,
                &bytes,
                slot.diameter,
                slot.diameter,
                i64::from(slot.x),
                i64::from(slot.y),
            );
        }
        Ok(())
    }

    /// Brand mark near the top-right corner: alpha-aware paste of the
    /// resolved bitmap, or the synthesized two-tone text mark.
    fn draw_mark(&mut self, data: &mut [u8]) {
        let page_w = self.geometry.page_width;
        let page_h = self.geometry.page_height;
        match &self.mark {
            BrandMark::Bitmap {
                width,
                height,
                rgba8_premul,
            } => {
                let x = i64::from(page_w)
                    - i64::from(*width)
                    - i64::from(self.geometry.mark_right_margin);
                blit::over_at(
                    data,
                    page_w,
                    page_h,
                    rgba8_premul,
                    *width,
                    *height,
                    x,
                    i64::from(self.geometry.mark_top),
                );
            }
            BrandMark::Text => {
                let x = f64::from(page_w)
                    - f64::from(self.geometry.mark_block_width)
                    - f64::from(self.geometry.mark_right_margin);
                let y = f64::from(self.geometry.mark_top);
                let title_px = self.geometry.mark_title_px;
                let lines = [
                    (self.theme.title.clone(), title_px, self.palette.mark_primary, 10.0),
                    (
                        self.theme.subtitle.clone(),
                        title_px,
                        self.palette.mark_secondary,
                        10.0 + f64::from(title_px),
                    ),
                    (
                        self.theme.tagline.clone(),
                        self.geometry.mark_tagline_px,
                        self.palette.mark_primary,
                        15.0 + 2.0 * f64::from(title_px),
                    ),
                ];
                for (text, size_px, color, dy) in lines {
                    self.draw_text(data, &text, Point::new(x + 10.0, y + dy), size_px, color);
                }
            }
        }
    }

    /// Name box sized to the measured text, and the fixed price box below it.
    fn draw_labels(&mut self, data: &mut [u8], identity: &ProductIdentity) {
        let page_w = self.geometry.page_width;
        let page_h = self.geometry.page_height;
        let pad = self.geometry.label_pad;
        let font_px = self.geometry.label_font_px;
        let origin = self.geometry.name_box_origin;
        let price_box = self.geometry.price_box;
        let inset = self.geometry.price_text_inset;

        let (name_w, name_h) = self.painter.measure(&identity.name, font_px);
        let name_box = Rect::new(
            origin.x,
            origin.y,
            origin.x + name_w + 2.0 * pad,
            origin.y + name_h + 2.0 * pad,
        );
        blit::fill_rect(data, page_w, page_h, &name_box, self.palette.accent.premul());
        self.draw_text(
            data,
            &identity.name,
            Point::new(origin.x + pad, origin.y + pad),
            font_px,
            self.palette.ink,
        );

        blit::fill_rect(
            data,
            page_w,
            page_h,
            &price_box,
            self.palette.background.premul(),
        );
        let (_, price_h) = self.painter.measure(&identity.price_label, font_px);
        let price_y = price_box.y0 + ((price_box.height() - price_h) / 2.0).max(0.0);
        self.draw_text(
            data,
            &identity.price_label,
            Point::new(price_box.x0 + inset, price_y),
            font_px,
            self.palette.ink,
        );
    }

    fn draw_text(&mut self, data: &mut [u8], text: &str, origin: Point, size_px: f32, color: Rgba8) {
        let Some(tile) = self.painter.raster(text, size_px, color) else {
            return;
        };
        blit::over_at(
            data,
            self.geometry.page_width,
            self.geometry.page_height,
            &tile.rgba8_premul,
            tile.width,
            tile.height,
            origin.x.round() as i64,
            origin.y.round() as i64,
        );
    }
}
