//! Octorun installation library
//!
//! Provides programmatic installation of the bundled octorun runtime into a
//! cache directory, designed to be called by the host application at startup.

pub mod details;
mod detection;
mod error;
mod extract;
mod file_ops;
mod installer;
mod resources;

// Public exports
pub use details::{InstallDetails, PACKAGE_VERSION};
pub use detection::{InstallationState, check_installation_state};
pub use error::InstallerError;
pub use extract::{ArchiveExtractor, UnzipOutcome, UnzipTask, ZipExtractor};
pub use installer::{EXTRACT_TEMP_PREFIX, OctorunInstaller};
pub use resources::{EmbeddedResources, ResourceKind, ResourceProvider};

use std::path::PathBuf;

use log::info;
use tokio_util::sync::CancellationToken;

use crate::config::InstallerConfig;

/// Ensure octorun is extracted under the configured cache root
///
/// This is the main entry point for host applications.
///
/// # Returns
/// - `Ok(Some(path))` with the path to `app.js` when a valid install exists
/// - `Ok(None)` if extraction failed or was cancelled
/// - `Err(e)` on file system errors
pub async fn ensure_installed(
    config: &InstallerConfig,
    token: CancellationToken,
) -> Result<Option<PathBuf>, InstallerError> {
    let details = config.install_details()?;
    info!(
        "Ensuring octorun {} under {}",
        PACKAGE_VERSION,
        details.base_cache_path().display()
    );

    OctorunInstaller::new(details, token).ensure_installed().await
}
