use std::path::Path;

use crate::assets::decode::decode_image;
use crate::compose::blit;

/// Brand-mark bitmap file names probed in the assets directory, in order.
const MARK_CANDIDATES: [&str; 3] = ["logo.png", "logo.webp", "logo.jpg"];

#[derive(Clone, Debug)]
/// Outcome of the brand-mark resolution chain.
pub enum BrandMark {
    /// Decoded mark bitmap, premultiplied for alpha-aware pasting.
    Bitmap {
        /// Bitmap width in pixels.
        width: u32,
        /// Bitmap height in pixels.
        height: u32,
        /// Premultiplied pixel bytes, row-major.
        rgba8_premul: Vec<u8>,
    },
    /// No bitmap resolved; the composer renders the synthesized text mark.
    Text,
}

/// Resolve the brand mark from the assets directory.
///
/// Candidates are tried in order with isolated failure handling: a missing
/// or corrupt file only moves resolution along, and exhausting the list
/// selects the synthesized text mark. This never produces an error — a
/// broken mark asset must not abort page composition.
pub fn resolve_brand_mark(assets_dir: Option<&Path>) -> BrandMark {
    let Some(dir) = assets_dir else {
        tracing::debug!("no assets directory; using the synthesized text mark");
        return BrandMark::Text;
    };

    for candidate in MARK_CANDIDATES {
        let path = dir.join(candidate);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        match decode_image(&bytes) {
            Ok(img) => {
                let (width, height) = img.dimensions();
                let mut rgba8_premul = img.into_raw();
                blit::premultiply_rgba8_in_place(&mut rgba8_premul);
                tracing::info!(mark = %path.display(), "using brand mark bitmap");
                return BrandMark::Bitmap {
                    width,
                    height,
                    rgba8_premul,
                };
            }
            Err(err) => {
                tracing::warn!(mark = %path.display(), error = %err, "brand mark failed to decode");
            }
        }
    }

    tracing::warn!(dir = %dir.display(), "no brand mark bitmap found; using the synthesized text mark");
    BrandMark::Text
}
