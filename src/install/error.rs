//! Error types for the octorun installer

use std::path::PathBuf;

use thiserror::Error;

use super::resources::ResourceKind;

/// Errors raised while preparing, extracting or moving the octorun payload
///
/// A missing or stale install is not an error; it only triggers re-extraction.
/// Extraction failures are reported through [`super::UnzipOutcome`] instead of
/// this type when they surface from [`super::OctorunInstaller::ensure_installed`].
#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("embedded resource not found: {kind:?}/{name}")]
    ResourceNotFound { kind: ResourceKind, name: String },

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("extraction cancelled")]
    Cancelled,

    #[error("install finished but executable is missing at {}", .0.display())]
    MissingExecutable(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not determine a cache directory for this user")]
    NoCacheDir,
}

impl InstallerError {
    /// Wrap an I/O error with a description of the operation that failed
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        InstallerError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attach context to `std::io::Result` values, mirroring `anyhow::Context`
pub(crate) trait IoResultExt<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, InstallerError>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T, InstallerError>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| InstallerError::io(f(), e))
    }
}
