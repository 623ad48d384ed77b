use std::path::{Path, PathBuf};

use crate::catalog::group::scan_directory;
use crate::compose::page::PageComposer;
use crate::encode::jpeg::write_jpeg;
use crate::foundation::error::LookbookResult;
use crate::foundation::geometry::{BrandTheme, PageGeometry, Palette};

/// Catalog pages are always encoded at this JPEG quality.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Clone, Debug, Default)]
/// Driver options.
pub struct BuildOpts {
    /// Directory holding the optional brand mark bitmap and bundled fonts.
    pub assets_dir: Option<PathBuf>,
    /// Abort on the first failed product group instead of skipping it.
    ///
    /// A decode failure is always fatal for its own page; this flag decides
    /// whether it is fatal for the whole run.
    pub fail_fast: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters for one catalog run.
pub struct BuildStats {
    /// Product groups discovered in the input directory.
    pub groups_total: usize,
    /// Pages successfully composed and written.
    pub pages_written: usize,
    /// Groups skipped after a compose or decode failure.
    pub groups_failed: usize,
}

#[derive(Clone, Debug, Default)]
/// Drives the full catalog run: group, compose, encode, one group at a time.
pub struct CatalogBuilder {
    /// Fixed page layout.
    pub geometry: PageGeometry,
    /// Catalog color scheme.
    pub palette: Palette,
    /// Synthesized-mark text.
    pub theme: BrandTheme,
    /// Driver options.
    pub opts: BuildOpts,
}

impl CatalogBuilder {
    /// Compose and persist one catalog page per product group found in
    /// `input_dir`, writing JPEGs into `output_dir`.
    ///
    /// Zero discovered groups is a normal outcome: it logs a diagnostic and
    /// returns zeroed stats without touching the output directory. An
    /// unreadable input directory or unwritable output is an error; a failed
    /// group is only an error under [`BuildOpts::fail_fast`].
    #[tracing::instrument(skip(self))]
    pub fn build(&self, input_dir: &Path, output_dir: &Path) -> LookbookResult<BuildStats> {
        let groups = scan_directory(input_dir)?;
        if groups.is_empty() {
            tracing::info!(
                input = %input_dir.display(),
                "no product groups found; check the image filenames"
            );
            return Ok(BuildStats::default());
        }
        tracing::info!(groups = groups.len(), "composing catalog pages");

        let mut composer = PageComposer::new(
            self.geometry.clone(),
            self.palette,
            self.theme.clone(),
            self.opts.assets_dir.as_deref(),
        );

        let mut stats = BuildStats {
            groups_total: groups.len(),
            ..BuildStats::default()
        };
        for group in &groups {
            let page = match composer.compose(group) {
                Ok(page) => page,
                Err(err) if !self.opts.fail_fast => {
                    tracing::warn!(
                        product = %group.identity.name,
                        error = %err,
                        "skipping product group"
                    );
                    stats.groups_failed += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            let out_path = output_dir.join(group.identity.page_file_name());
            write_jpeg(&out_path, &page, JPEG_QUALITY)?;
            tracing::info!(page = %out_path.display(), "created catalog page");
            stats.pages_written += 1;
        }

        Ok(stats)
    }
}
