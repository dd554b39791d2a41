//! Installs the bundled octorun runtime into a local cache directory.
//!
//! The archive ships inside the binary; nothing is downloaded. See
//! [`install::OctorunInstaller`] for the install algorithm and
//! [`config::InstallerConfig`] for where the cache root comes from.

pub mod config;
pub mod install;

pub use config::InstallerConfig;
pub use install::{InstallerError, OctorunInstaller, ensure_installed};
