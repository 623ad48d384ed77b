use std::path::Path;

use crate::foundation::error::{LookbookError, LookbookResult};

/// Read and decode an image file into straight-alpha RGBA8.
///
/// Any read or decode failure is reported as [`LookbookError::Decode`]; the
/// caller decides whether that is fatal for the surrounding batch.
pub fn decode_image_file(path: &Path) -> LookbookResult<image::RgbaImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| LookbookError::decode(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
        .map_err(|e| LookbookError::decode(format!("decode image '{}': {e}", path.display())))
}

/// Decode encoded image bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> LookbookResult<image::RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| LookbookError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.to_rgba8())
}
