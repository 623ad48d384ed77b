use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context as _;

use crate::compose::page::PageSurface;
use crate::foundation::error::LookbookResult;

/// Create the parent directory of `path` when it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> LookbookResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Encode a composed page as a JPEG file at the given quality.
pub fn write_jpeg(path: &Path, page: &PageSurface, quality: u8) -> LookbookResult<()> {
    ensure_parent_dir(path)?;

    let file = File::create(path)
        .with_context(|| format!("create output file '{}'", path.display()))?;
    let writer = BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality);
    image::ImageEncoder::write_image(
        encoder,
        &page.to_rgb8(),
        page.width,
        page.height,
        image::ExtendedColorType::Rgb8,
    )
    .with_context(|| format!("encode jpeg '{}'", path.display()))?;
    Ok(())
}
