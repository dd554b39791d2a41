//! Archive extraction for the bundled payload
//!
//! [`ArchiveExtractor`] is the seam the installer extracts through; the
//! default [`ZipExtractor`] unpacks `.zip` archives with the `zip` crate.
//! [`UnzipTask`] runs one extraction on the blocking pool and folds any
//! failure into a success flag.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{trace, warn};
use tokio_util::sync::CancellationToken;
use zip::ZipArchive;

use super::error::{InstallerError, IoResultExt};
use super::file_ops;

/// Unpacks an archive into a directory
pub trait ArchiveExtractor: Send + Sync {
    /// Extract every entry of `archive` below `dest`
    ///
    /// Implementations should poll `cancel` regularly and return
    /// [`InstallerError::Cancelled`] once it fires.
    fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), InstallerError>;
}

/// Zip extraction backed by the `zip` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        archive: &Path,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), InstallerError> {
        let zip_file =
            File::open(archive).io_context(|| format!("Failed to open {}", archive.display()))?;
        let mut archive = ZipArchive::new(zip_file)?;

        file_ops::ensure_dir(dest)?;

        for i in 0..archive.len() {
            if cancel.is_cancelled() {
                return Err(InstallerError::Cancelled);
            }

            let mut entry = archive.by_index(i)?;

            // Entries escaping `dest` (absolute paths, `..`) are dropped
            let Some(relative) = entry.enclosed_name() else {
                warn!("Skipping unsafe archive entry {}", entry.name());
                continue;
            };
            let out_path = dest.join(relative);

            if entry.is_dir() {
                file_ops::ensure_dir(&out_path)?;
            } else {
                file_ops::ensure_parent_dir(&out_path)?;
                let mut out_file = File::create(&out_path)
                    .io_context(|| format!("Failed to create {}", out_path.display()))?;
                io::copy(&mut entry, &mut out_file)
                    .io_context(|| format!("Failed to extract {}", out_path.display()))?;
            }

            #[cfg(unix)]
            {
                use std::fs;
                use std::os::unix::fs::PermissionsExt;

                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                        .io_context(|| format!("Failed to set permissions on {}", out_path.display()))?;
                }
            }
        }

        trace!("Extracted {} entries into {}", archive.len(), dest.display());
        Ok(())
    }
}

/// Result of an [`UnzipTask`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnzipOutcome {
    pub successful: bool,
    pub extract_path: PathBuf,
}

/// One extraction of `archive` into `dest`
pub struct UnzipTask {
    token: CancellationToken,
    archive: PathBuf,
    dest: PathBuf,
    extractor: Arc<dyn ArchiveExtractor>,
}

impl UnzipTask {
    pub fn new(
        token: CancellationToken,
        archive: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        extractor: Arc<dyn ArchiveExtractor>,
    ) -> Self {
        Self {
            token,
            archive: archive.into(),
            dest: dest.into(),
            extractor,
        }
    }

    /// Run the extraction on the blocking pool
    ///
    /// Never fails: errors, cancellation and panics in the extractor all come
    /// back as `successful == false`.
    pub async fn run(self) -> UnzipOutcome {
        let Self {
            token,
            archive,
            dest,
            extractor,
        } = self;

        let extract_path = dest.clone();
        let result = tokio::task::spawn_blocking(move || {
            extractor.extract(&archive, &dest, &token)
        })
        .await;

        let successful = match result {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!("Extracting into {} failed: {e}", extract_path.display());
                false
            }
            Err(e) => {
                warn!("Extraction task for {} aborted: {e}", extract_path.display());
                false
            }
        };

        UnzipOutcome {
            successful,
            extract_path,
        }
    }
}
