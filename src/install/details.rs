//! Paths and version constants for an octorun install
//!
//! Everything is derived from a single cache root:
//!
//! ```text
//! <cache>/downloads/octorun.zip     bundled archive, rewritten on every run
//! <cache>/octorun/                  install directory
//! <cache>/octorun/version           version marker shipped inside the archive
//! <cache>/octorun/src/bin/app.js    executable entry point
//! ```

use std::path::{Path, PathBuf};

use super::error::InstallerError;
use super::file_ops;

/// Content version of the bundled `octorun.zip`
pub const PACKAGE_VERSION: &str = "9fcd9faa";

/// Name of the install directory and of the top-level folder inside the archive
pub const PACKAGE_NAME: &str = "octorun";

/// File name of the bundled archive
pub const ARCHIVE_FILE_NAME: &str = "octorun.zip";

/// Executable inside `<install>/src/bin`
pub const EXECUTABLE_NAME: &str = "app.js";

pub const DEFAULT_ARCHIVE_URL: &str = "https://ghfvs-installer.github.com/unity/octorun/octorun.zip";
pub const DEFAULT_ARCHIVE_CHECKSUM_URL: &str =
    "https://ghfvs-installer.github.com/unity/octorun/octorun.zip.md5";

const DOWNLOADS_DIR: &str = "downloads";
const VERSION_FILE: &str = "version";

#[derive(Debug, Clone)]
pub struct InstallDetails {
    base_cache_path: PathBuf,
    download_path: PathBuf,
    archive_file: PathBuf,
    install_path: PathBuf,
    executable_path: PathBuf,
    version_file: PathBuf,
    archive_url: String,
    archive_checksum_url: String,
}

impl InstallDetails {
    /// Derive all install paths from `base_cache_path`
    ///
    /// Creates `<base>/downloads` eagerly; nothing else is touched on disk.
    pub fn new(base_cache_path: impl Into<PathBuf>) -> Result<Self, InstallerError> {
        let base_cache_path = base_cache_path.into();

        let download_path = base_cache_path.join(DOWNLOADS_DIR);
        file_ops::ensure_dir(&download_path)?;
        let archive_file = download_path.join(ARCHIVE_FILE_NAME);

        let install_path = base_cache_path.join(PACKAGE_NAME);
        let executable_path = install_path.join("src").join("bin").join(EXECUTABLE_NAME);
        let version_file = install_path.join(VERSION_FILE);

        Ok(Self {
            base_cache_path,
            download_path,
            archive_file,
            install_path,
            executable_path,
            version_file,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
            archive_checksum_url: DEFAULT_ARCHIVE_CHECKSUM_URL.to_string(),
        })
    }

    /// Override the archive URLs
    ///
    /// Reserved for a network install path. The installer never fetches
    /// these; the archive always comes from the embedded resource.
    pub fn with_archive_urls(
        mut self,
        archive_url: impl Into<String>,
        archive_checksum_url: impl Into<String>,
    ) -> Self {
        self.archive_url = archive_url.into();
        self.archive_checksum_url = archive_checksum_url.into();
        self
    }

    pub fn base_cache_path(&self) -> &Path {
        &self.base_cache_path
    }

    pub fn download_path(&self) -> &Path {
        &self.download_path
    }

    pub fn archive_file(&self) -> &Path {
        &self.archive_file
    }

    pub fn install_path(&self) -> &Path {
        &self.install_path
    }

    /// File name of the octorun entry point, for hosts that hand it to a
    /// script runtime rather than launching the full path
    pub fn executable_name(&self) -> &'static str {
        EXECUTABLE_NAME
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    /// Version the marker file must contain for an install to be valid
    pub fn expected_version(&self) -> &'static str {
        PACKAGE_VERSION
    }

    pub fn archive_url(&self) -> &str {
        &self.archive_url
    }

    pub fn archive_checksum_url(&self) -> &str {
        &self.archive_checksum_url
    }
}
