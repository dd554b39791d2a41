//! Octorun installer
//!
//! Keeps an extracted copy of the bundled octorun runtime in the cache root.
//! The embedded archive is written to `<cache>/downloads` on every run and is
//! only extracted when the existing install is missing or carries a different
//! version marker.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, trace, warn};
use tokio_util::sync::CancellationToken;

use super::details::{ARCHIVE_FILE_NAME, InstallDetails, PACKAGE_NAME};
use super::detection::{InstallationState, check_installation_state};
use super::error::{InstallerError, IoResultExt};
use super::extract::{ArchiveExtractor, UnzipTask, ZipExtractor};
use super::file_ops;
use super::resources::{EmbeddedResources, ResourceKind, ResourceProvider};

/// Prefix of the per-run extraction directory
pub const EXTRACT_TEMP_PREFIX: &str = "octorun_extract_archive_path";

pub struct OctorunInstaller {
    details: InstallDetails,
    token: CancellationToken,
    extractor: Arc<dyn ArchiveExtractor>,
    resources: Arc<dyn ResourceProvider>,
    temp_root: PathBuf,
}

impl OctorunInstaller {
    /// Installer using the embedded archive and zip extraction
    pub fn new(details: InstallDetails, token: CancellationToken) -> Self {
        Self {
            details,
            token,
            extractor: Arc::new(ZipExtractor),
            resources: Arc::new(EmbeddedResources),
            temp_root: std::env::temp_dir(),
        }
    }

    /// Installer for a cache root with default paths
    pub fn for_cache_root(
        cache_root: impl Into<PathBuf>,
        token: CancellationToken,
    ) -> Result<Self, InstallerError> {
        Ok(Self::new(InstallDetails::new(cache_root)?, token))
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_resources(mut self, resources: Arc<dyn ResourceProvider>) -> Self {
        self.resources = resources;
        self
    }

    /// Directory under which extraction directories are created
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    pub fn details(&self) -> &InstallDetails {
        &self.details
    }

    pub fn installation_state(&self) -> Result<InstallationState, InstallerError> {
        check_installation_state(&self.details)
    }

    pub fn is_installed(&self) -> Result<bool, InstallerError> {
        Ok(self.installation_state()?.is_installed())
    }

    /// Make sure an up to date octorun is extracted and return its executable
    ///
    /// Returns `Ok(None)` when extraction failed or was cancelled and no
    /// valid install existed before; callers must not use a path in that case.
    /// File system failures outside the extraction step are returned as errors.
    pub async fn ensure_installed(&self) -> Result<Option<PathBuf>, InstallerError> {
        let installed = self.is_installed()?;
        trace!("octorun installed: {installed}");

        let mut path = installed.then(|| self.details.executable_path().to_path_buf());

        // Always refreshed, even when the install is reused.
        self.grab_archive_from_resources()?;

        if path.is_none() {
            file_ops::ensure_dir(&self.temp_root)?;
            let temp_dir = tempfile::Builder::new()
                .prefix(EXTRACT_TEMP_PREFIX)
                .tempdir_in(&self.temp_root)
                .io_context(|| {
                    format!(
                        "Failed to create extraction directory in {}",
                        self.temp_root.display()
                    )
                })?;

            let outcome = UnzipTask::new(
                self.token.clone(),
                self.details.archive_file(),
                temp_dir.path(),
                Arc::clone(&self.extractor),
            )
            .run()
            .await;

            let moved = if outcome.successful {
                Some(self.install_extracted(&outcome.extract_path.join(PACKAGE_NAME)))
            } else {
                warn!(
                    "Could not extract {}, octorun is not available",
                    self.details.archive_file().display()
                );
                None
            };

            let temp_path = temp_dir.path().to_path_buf();
            let cleanup = temp_dir
                .close()
                .io_context(|| format!("Failed to remove {}", temp_path.display()));

            path = moved.transpose()?;
            if let Err(e) = cleanup {
                if let Some(installed) = &path {
                    warn!(
                        "octorun installed at {} but the extraction directory was left behind",
                        installed.display()
                    );
                }
                return Err(e);
            }
        }

        Ok(path)
    }

    fn grab_archive_from_resources(&self) -> Result<PathBuf, InstallerError> {
        file_ops::delete_if_exists(self.details.archive_file())?;

        self.resources.write_to(
            ResourceKind::Generic,
            ARCHIVE_FILE_NAME,
            self.details.download_path(),
        )
    }

    /// Replace the install directory with the extracted payload at `from`
    fn install_extracted(&self, from: &Path) -> Result<PathBuf, InstallerError> {
        let to = self.details.install_path();
        trace!("Moving {} to {}", from.display(), to.display());

        file_ops::delete_if_exists(to)?;
        file_ops::ensure_parent_dir(to)?;
        file_ops::move_dir(from, to)?;

        // A payload without the executable must not pass the next validity check.
        let executable = self.details.executable_path();
        if !executable.is_file() {
            file_ops::delete_if_exists(to)?;
            return Err(InstallerError::MissingExecutable(executable.to_path_buf()));
        }

        info!("octorun installed at {}", to.display());
        Ok(executable.to_path_buf())
    }
}
