//! Lookbook turns a directory of per-variant product photographs into
//! fixed-layout catalog pages: one JPEG per product, combining a full-bleed
//! hero photo, circular detail thumbnails cropped from the remaining
//! variants, a brand mark, and name/price label boxes.
//!
//! # Pipeline overview
//!
//! 1. **Group**: scan a directory, parse every filename stem into
//!    `(name, price, variant)` and bucket images into [`ProductGroup`]s
//!    (see [`scan_directory`]).
//! 2. **Compose**: lay one group out on a fixed-size canvas — hero stretch,
//!    thumbnail column/grid, brand mark, measured label boxes
//!    ([`PageComposer`]).
//! 3. **Encode**: persist each page as a quality-95 JPEG with a name derived
//!    from the product identity ([`CatalogBuilder`]).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: directory order, grouping, and compositing
//!   are stable for a given input; reruns produce identical pages.
//! - **Layout is data**: all page geometry lives in [`PageGeometry`], an
//!   immutable value passed into the composer, never global state.
//! - **Missing assets never abort a page**: the brand mark and font resolve
//!   through ordered fallback chains ending in built-in renderers.
#![forbid(unsafe_code)]

mod assets;
mod catalog;
mod compose;
mod encode;
mod foundation;
mod pipeline;

pub use assets::decode::decode_image_file;
pub use assets::font::{
    ResolvedFont, TextBrushRgba8, TextLayoutEngine, TextPainter, TextRaster, resolve_font,
};
pub use assets::mark::{BrandMark, resolve_brand_mark};
pub use catalog::group::{ProductGroup, ProductIdentity, ProductImage, scan_directory};
pub use catalog::parse::{ParsedStem, parse_stem};
pub use compose::page::{PageComposer, PageSurface};
pub use compose::thumb::{Ring, circular_thumbnail};
pub use encode::jpeg::{ensure_parent_dir, write_jpeg};
pub use foundation::error::{LookbookError, LookbookResult};
pub use foundation::geometry::{BrandTheme, PageGeometry, Palette, Rgba8, ThumbSlot};
pub use pipeline::{BuildOpts, BuildStats, CatalogBuilder, JPEG_QUALITY};
