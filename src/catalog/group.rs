use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::catalog::parse::parse_stem;
use crate::foundation::error::LookbookResult;

/// Image extensions considered product photos, compared case-insensitively.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One discovered product photo.
pub struct ProductImage {
    /// Path of the source file.
    pub source_path: PathBuf,
    /// Variant ordinal from the filename; `1` is the hero photo.
    pub variant: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Normalized product identity: the grouping key and the label content.
pub struct ProductIdentity {
    /// Product name with underscores normalized to spaces and trimmed.
    pub name: String,
    /// Display-formatted price label (`$29.990`).
    pub price_label: String,
}

impl ProductIdentity {
    /// Composite grouping key.
    pub fn key(&self) -> String {
        format!("{}-{}", self.name, self.price_label)
    }

    /// Deterministic output filename for this product's catalog page.
    pub fn page_file_name(&self) -> String {
        let name = self.name.replace(' ', "_").replace('/', "");
        let digits: String = self
            .price_label
            .chars()
            .filter(|c| *c != '$' && *c != '.')
            .collect();
        format!("{name}-{digits}-catalog.jpg")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// All images sharing one normalized name and price: one catalog entry.
pub struct ProductGroup {
    /// Shared identity of the group.
    pub identity: ProductIdentity,
    /// Images sorted ascending by variant after the scan completes.
    pub images: Vec<ProductImage>,
}

impl ProductGroup {
    /// The variant-1 photo rendered full-bleed, when the group has images.
    pub fn hero(&self) -> Option<&ProductImage> {
        self.images.first()
    }

    /// Detail shots after the hero, in variant order.
    pub fn detail_shots(&self) -> &[ProductImage] {
        if self.images.is_empty() {
            &[]
        } else {
            &self.images[1..]
        }
    }
}

/// Scan the direct children of `dir` and bucket parseable product photos
/// into groups keyed by normalized name and price.
///
/// The listing is sorted by file name before parsing, so group order and
/// duplicate-variant tie order are stable across reruns regardless of how
/// the filesystem enumerates entries. Files whose stems do not parse are
/// logged and skipped; they never abort the scan.
#[tracing::instrument]
pub fn scan_directory(dir: &Path) -> LookbookResult<Vec<ProductGroup>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read input directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list input directory '{}'", dir.display()))?;
        let path = entry.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut index = HashMap::<String, usize>::new();
    let mut groups = Vec::<ProductGroup>::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!(file = %path.display(), "skipping file with non-unicode name");
            continue;
        };

        let parsed = match parse_stem(stem) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "could not parse filename");
                continue;
            }
        };

        let identity = ProductIdentity {
            name: parsed.name.replace('_', " ").trim().to_string(),
            price_label: parsed.price_label,
        };
        let image = ProductImage {
            source_path: path,
            variant: parsed.variant,
        };

        let key = identity.key();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(ProductGroup {
                identity,
                images: Vec::new(),
            });
            groups.len() - 1
        });
        tracing::debug!(file = %image.source_path.display(), group = %groups[slot].identity.key(), "grouped");
        groups[slot].images.push(image);
    }

    // Single finalize pass; the stable sort keeps discovery order between
    // duplicate variant indices.
    for group in &mut groups {
        group.images.sort_by_key(|img| img.variant);
    }

    Ok(groups)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == e)
        })
        .unwrap_or(false)
}
