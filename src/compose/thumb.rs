use image::RgbaImage;
use image::imageops::FilterType;

use crate::foundation::error::{LookbookError, LookbookResult};
use crate::foundation::geometry::Rgba8;

#[derive(Clone, Copy, Debug)]
/// Ring stroked inside the thumbnail's disc edge.
pub struct Ring {
    /// Stroke color.
    pub color: Rgba8,
    /// Stroke width in pixels, drawn inward from the disc edge.
    pub width: u32,
}

/// Produce a circular detail thumbnail from a product photo.
///
/// The crop is a square of side `min(width, height / 2)` centered
/// horizontally and anchored to the top edge — product photos are portrait
/// and the face/torso area sits in the upper half, so this is deliberately
/// not a center crop. The crop is resized to `diameter` with Lanczos
/// resampling, then masked to a hard-edged disc: pixels outside the
/// inscribed circle become fully transparent, pixels inside fully opaque.
/// An optional ring is stroked inward from the disc edge, confined to the
/// disc.
pub fn circular_thumbnail(
    src: &RgbaImage,
    diameter: u32,
    ring: Option<Ring>,
) -> LookbookResult<RgbaImage> {
    if diameter == 0 {
        return Err(LookbookError::compose("thumbnail diameter must be > 0"));
    }

    let (width, height) = src.dimensions();
    let crop_size = width.min(height / 2);
    if crop_size == 0 {
        return Err(LookbookError::compose(format!(
            "source image {width}x{height} is too small for a top-center crop"
        )));
    }

    let left = (width - crop_size) / 2;
    let cropped = image::imageops::crop_imm(src, left, 0, crop_size, crop_size).to_image();
    let mut out = image::imageops::resize(&cropped, diameter, diameter, FilterType::Lanczos3);

    // Disc inscribed in the bounding square, matching an ellipse drawn over
    // (0, 0, d-1, d-1).
    let center = f64::from(diameter - 1) / 2.0;
    let radius = center;
    let radius_sq = radius * radius;
    let ring_inner = ring.map(|r| radius - f64::from(r.width));

    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) - center;
        let dy = f64::from(y) - center;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq > radius_sq {
            px.0 = [0, 0, 0, 0];
            continue;
        }
        px.0[3] = 255;
        if let (Some(ring), Some(inner)) = (ring, ring_inner)
            && dist_sq.sqrt() > inner
        {
            px.0 = [ring.color.r, ring.color.g, ring.color.b, 255];
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone_source(width: u32, height: u32) -> RgbaImage {
        // Top half red, bottom half blue.
        RgbaImage::from_fn(width, height, |_, y| {
            if y < height / 2 {
                image::Rgba([200, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 200, 255])
            }
        })
    }

    #[test]
    fn output_is_square_at_requested_diameter() {
        let src = two_tone_source(100, 300);
        let thumb = circular_thumbnail(&src, 40, None).unwrap();
        assert_eq!(thumb.dimensions(), (40, 40));
    }

    #[test]
    fn corners_transparent_center_opaque() {
        let src = two_tone_source(120, 240);
        let d = 50;
        let thumb = circular_thumbnail(&src, d, None).unwrap();

        for (x, y) in [(0, 0), (d - 1, 0), (0, d - 1), (d - 1, d - 1)] {
            assert_eq!(thumb.get_pixel(x, y).0[3], 0, "corner ({x},{y})");
        }
        assert_eq!(thumb.get_pixel(d / 2, d / 2).0[3], 255);
    }

    #[test]
    fn crop_prefers_the_top_of_the_photo() {
        // Source is red over blue; the crop anchors to the top edge, so the
        // whole thumbnail comes from the red region.
        let src = two_tone_source(100, 400);
        let thumb = circular_thumbnail(&src, 30, None).unwrap();
        let center = thumb.get_pixel(15, 15).0;
        assert!(center[0] > 150 && center[2] < 50, "got {center:?}");
    }

    #[test]
    fn ring_paints_the_disc_edge_only() {
        let src = two_tone_source(100, 400);
        let d = 60;
        let ring = Ring {
            color: Rgba8::rgb(137, 213, 201),
            width: 3,
        };
        let thumb = circular_thumbnail(&src, d, Some(ring)).unwrap();

        // A disc pixel just inside the right edge on the midline sits in the
        // ring (the outermost column itself falls outside the inscribed
        // disc for even diameters).
        let edge = thumb.get_pixel(d - 2, (d - 1) / 2).0;
        assert_eq!(edge, [137, 213, 201, 255]);
        // The center keeps photo content.
        let center = thumb.get_pixel(d / 2, d / 2).0;
        assert!(center[0] > 150, "got {center:?}");
    }

    #[test]
    fn degenerate_sources_are_rejected() {
        let src = two_tone_source(10, 1);
        assert!(circular_thumbnail(&src, 40, None).is_err());

        let src = two_tone_source(10, 10);
        assert!(circular_thumbnail(&src, 0, None).is_err());
    }
}
