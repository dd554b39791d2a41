//! Embedded resources shipped inside the installer binary
//!
//! `build.rs` packs `resources/octorun/` into `$OUT_DIR/octorun.zip`, which is
//! compiled in here and written to disk on demand.

use std::fs;
use std::path::{Path, PathBuf};

use log::trace;

use super::error::{InstallerError, IoResultExt};
use super::file_ops;

/// Bundled octorun archive
const OCTORUN_ZIP: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/octorun.zip"));

/// Resource category
///
/// Only platform independent payloads are bundled today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Platform independent payloads
    Generic,
}

/// Source of resource bytes for the installer
pub trait ResourceProvider: Send + Sync {
    /// Write resource `name` into `dest_dir`, returning the written file
    fn write_to(
        &self,
        kind: ResourceKind,
        name: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, InstallerError>;
}

/// Resources compiled into this crate
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedResources;

impl EmbeddedResources {
    fn lookup(kind: ResourceKind, name: &str) -> Option<&'static [u8]> {
        match (kind, name) {
            (ResourceKind::Generic, "octorun.zip") => Some(OCTORUN_ZIP),
            _ => None,
        }
    }
}

impl ResourceProvider for EmbeddedResources {
    fn write_to(
        &self,
        kind: ResourceKind,
        name: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, InstallerError> {
        let bytes = Self::lookup(kind, name).ok_or_else(|| InstallerError::ResourceNotFound {
            kind,
            name: name.to_string(),
        })?;

        file_ops::ensure_dir(dest_dir)?;
        let target = dest_dir.join(name);
        fs::write(&target, bytes).io_context(|| format!("Failed to write {}", target.display()))?;

        trace!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}
