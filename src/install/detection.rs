//! Installation state detection
//!
//! Decides whether the octorun install under the cache root can be reused:
//! - install directory present
//! - version marker present
//! - marker content equal to [`PACKAGE_VERSION`](super::details::PACKAGE_VERSION)
//!
//! Anything else means the bundled archive has to be extracted again.

use log::warn;

use super::details::InstallDetails;
use super::error::InstallerError;
use super::file_ops;

/// Installation state enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationState {
    /// Install directory does not exist
    NotInstalled,
    /// Install directory exists but has no version marker
    MissingVersion,
    /// Version marker does not match the bundled archive
    Outdated { found: String },
    /// Install matches the bundled archive
    Installed,
}

impl InstallationState {
    pub fn is_installed(&self) -> bool {
        matches!(self, InstallationState::Installed)
    }
}

/// Check current installation state
///
/// The marker comparison is exact and byte-wise: a trailing newline or
/// non UTF-8 content counts as a mismatch. A marker that cannot be read at
/// all is an I/O error, not a stale install.
pub fn check_installation_state(
    details: &InstallDetails,
) -> Result<InstallationState, InstallerError> {
    if !details.install_path().is_dir() {
        return Ok(InstallationState::NotInstalled);
    }

    if !details.version_file().is_file() {
        return Ok(InstallationState::MissingVersion);
    }

    let raw = file_ops::read(details.version_file())?;
    if raw != details.expected_version().as_bytes() {
        let found = String::from_utf8_lossy(&raw).into_owned();
        warn!(
            "Current version {} does not match expected {}",
            found,
            details.expected_version()
        );
        return Ok(InstallationState::Outdated { found });
    }

    Ok(InstallationState::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::details::PACKAGE_VERSION;
    use std::fs;

    fn details() -> (tempfile::TempDir, InstallDetails) {
        let tmp = tempfile::tempdir().unwrap();
        let details = InstallDetails::new(tmp.path()).unwrap();
        (tmp, details)
    }

    #[test]
    fn empty_cache_is_not_installed() {
        let (_tmp, details) = details();
        assert_eq!(
            check_installation_state(&details).unwrap(),
            InstallationState::NotInstalled
        );
    }

    #[test]
    fn install_file_instead_of_dir_is_not_installed() {
        let (_tmp, details) = details();
        fs::write(details.install_path(), "not a directory").unwrap();
        assert_eq!(
            check_installation_state(&details).unwrap(),
            InstallationState::NotInstalled
        );
    }

    #[test]
    fn missing_marker() {
        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        assert_eq!(
            check_installation_state(&details).unwrap(),
            InstallationState::MissingVersion
        );
    }

    #[test]
    fn one_character_difference_is_outdated() {
        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        fs::write(details.version_file(), "9fcd9fab").unwrap();

        let state = check_installation_state(&details).unwrap();
        assert_eq!(
            state,
            InstallationState::Outdated {
                found: "9fcd9fab".to_string()
            }
        );
        assert!(!state.is_installed());
    }

    #[test]
    fn trailing_newline_is_outdated() {
        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        fs::write(details.version_file(), format!("{PACKAGE_VERSION}\n")).unwrap();

        assert!(!check_installation_state(&details).unwrap().is_installed());
    }

    #[test]
    fn non_utf8_marker_is_outdated() {
        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        fs::write(details.version_file(), [0xff, 0xfe, 0x00, 0x39]).unwrap();

        let state = check_installation_state(&details).unwrap();
        assert!(matches!(
            state,
            InstallationState::Outdated { ref found } if found.contains('\u{fffd}')
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_marker_is_an_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        fs::write(details.version_file(), PACKAGE_VERSION).unwrap();
        fs::set_permissions(details.version_file(), fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file modes
        if fs::read(details.version_file()).is_ok() {
            return;
        }
        assert!(matches!(
            check_installation_state(&details),
            Err(InstallerError::Io { .. })
        ));
    }

    #[test]
    fn matching_marker_is_installed() {
        let (_tmp, details) = details();
        fs::create_dir_all(details.install_path()).unwrap();
        fs::write(details.version_file(), PACKAGE_VERSION).unwrap();

        assert!(check_installation_state(&details).unwrap().is_installed());
    }
}
