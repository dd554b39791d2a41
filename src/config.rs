use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::install::details::{DEFAULT_ARCHIVE_CHECKSUM_URL, DEFAULT_ARCHIVE_URL};
use crate::install::{InstallDetails, InstallerError};

/// Environment variable overriding the cache root
pub const CACHE_DIR_ENV: &str = "OCTORUN_CACHE_DIR";

/// Directory below the user cache dir used when nothing else is configured
const DEFAULT_CACHE_SUBDIR: &str = "octorun-installer";

/// Installer configuration, read from TOML.
///
/// ```toml
/// cache_dir = "/var/cache/my-app"
/// archive_url = "https://ghfvs-installer.github.com/unity/octorun/octorun.zip"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Cache root; falls back to `$OCTORUN_CACHE_DIR`, then the user cache dir
    pub cache_dir: Option<PathBuf>,
    /// Reserved for network installs, never fetched
    pub archive_url: String,
    /// Reserved for network installs, never fetched
    pub archive_checksum_url: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            archive_url: DEFAULT_ARCHIVE_URL.into(),
            archive_checksum_url: DEFAULT_ARCHIVE_CHECKSUM_URL.into(),
        }
    }
}

impl InstallerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, InstallerError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| InstallerError::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_toml(&raw)
            .map_err(|e| InstallerError::Config(format!("{}: {e}", path.display())))
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, InstallerError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    /// Resolve the cache root: explicit setting, then environment, then
    /// `dirs::cache_dir()/octorun-installer`
    pub fn resolve_cache_dir(&self) -> Result<PathBuf, InstallerError> {
        self.resolve_cache_dir_with(std::env::var_os(CACHE_DIR_ENV), dirs::cache_dir())
    }

    fn resolve_cache_dir_with(
        &self,
        env_override: Option<OsString>,
        user_cache: Option<PathBuf>,
    ) -> Result<PathBuf, InstallerError> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        if let Some(dir) = env_override.filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        user_cache
            .map(|dir| dir.join(DEFAULT_CACHE_SUBDIR))
            .ok_or(InstallerError::NoCacheDir)
    }

    /// Build the install paths for this configuration
    ///
    /// Creates `<cache>/downloads` as a side effect.
    pub fn install_details(&self) -> Result<InstallDetails, InstallerError> {
        let details = InstallDetails::new(self.resolve_cache_dir()?)?;
        Ok(details.with_archive_urls(&self.archive_url, &self.archive_checksum_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = InstallerConfig::from_toml("").unwrap();
        assert_eq!(config, InstallerConfig::default());
        assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn parses_partial_toml() {
        let config = InstallerConfig::from_toml(
            r#"
            cache_dir = "/srv/cache"
            archive_url = "https://mirror.example/octorun.zip"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache_dir, Some(PathBuf::from("/srv/cache")));
        assert_eq!(config.archive_url, "https://mirror.example/octorun.zip");
        assert_eq!(config.archive_checksum_url, DEFAULT_ARCHIVE_CHECKSUM_URL);
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(InstallerConfig::from_toml("cache_dir = 42").is_err());
    }

    #[test]
    fn load_reports_config_errors_with_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("installer.toml");
        fs::write(&path, "archive_url = [").unwrap();

        let err = InstallerConfig::load(&path).unwrap_err();
        assert!(matches!(err, InstallerError::Config(ref msg) if msg.contains("installer.toml")));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = InstallerConfig::load(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, InstallerError::Io { .. }));
    }

    #[test]
    fn cache_dir_precedence() {
        let explicit = InstallerConfig::default().with_cache_dir("/explicit");
        assert_eq!(
            explicit
                .resolve_cache_dir_with(Some("/env".into()), Some("/home/u/.cache".into()))
                .unwrap(),
            PathBuf::from("/explicit")
        );

        let config = InstallerConfig::default();
        assert_eq!(
            config
                .resolve_cache_dir_with(Some("/env".into()), Some("/home/u/.cache".into()))
                .unwrap(),
            PathBuf::from("/env")
        );
        assert_eq!(
            config
                .resolve_cache_dir_with(Some("".into()), Some("/home/u/.cache".into()))
                .unwrap(),
            PathBuf::from("/home/u/.cache/octorun-installer")
        );
        assert!(matches!(
            config.resolve_cache_dir_with(None, None),
            Err(InstallerError::NoCacheDir)
        ));
    }

    #[test]
    fn install_details_carry_configured_urls() {
        let tmp = tempfile::tempdir().unwrap();
        let config = InstallerConfig {
            cache_dir: Some(tmp.path().to_path_buf()),
            archive_url: "https://mirror.example/o.zip".into(),
            archive_checksum_url: "https://mirror.example/o.zip.md5".into(),
        };

        let details = config.install_details().unwrap();
        assert_eq!(details.base_cache_path(), tmp.path());
        assert_eq!(details.archive_url(), "https://mirror.example/o.zip");
        assert_eq!(details.archive_checksum_url(), "https://mirror.example/o.zip.md5");
    }
}
