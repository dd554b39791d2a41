//! File system helpers used by the installer.
//!
//! Every helper maps I/O failures into [`InstallerError::Io`] with the path
//! involved, so callers can propagate with `?`.

use std::fs;
use std::io;
use std::path::Path;

use log::trace;
use walkdir::WalkDir;

use super::error::{InstallerError, IoResultExt};

/// Remove a file or directory tree if present
pub(crate) fn delete_if_exists(path: &Path) -> Result<(), InstallerError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(InstallerError::io(
                format!("Failed to stat {}", path.display()),
                e,
            ));
        }
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .io_context(|| format!("Failed to remove directory {}", path.display()))
    } else {
        fs::remove_file(path).io_context(|| format!("Failed to remove file {}", path.display()))
    }
}

/// Create the parent directory of `path` (and its ancestors)
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), InstallerError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .io_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

/// Create a directory and its ancestors
pub(crate) fn ensure_dir(path: &Path) -> Result<(), InstallerError> {
    fs::create_dir_all(path).io_context(|| format!("Failed to create directory {}", path.display()))
}

/// Read a whole file as raw bytes
pub(crate) fn read(path: &Path) -> Result<Vec<u8>, InstallerError> {
    fs::read(path).io_context(|| format!("Failed to read {}", path.display()))
}

/// Move a directory to `to`, which must not exist yet
///
/// Tries a rename first. When source and target live on different
/// filesystems the tree is copied and the source removed afterwards.
pub(crate) fn move_dir(from: &Path, to: &Path) -> Result<(), InstallerError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            trace!(
                "Rename across devices, copying {} to {}",
                from.display(),
                to.display()
            );
            copy_dir_recursive(from, to)?;
            delete_if_exists(from)
        }
        Err(e) => Err(InstallerError::io(
            format!("Failed to move {} to {}", from.display(), to.display()),
            e,
        )),
    }
}

fn copy_dir_recursive(from: &Path, to: &Path) -> Result<(), InstallerError> {
    for entry in WalkDir::new(from) {
        let entry = entry
            .map_err(io::Error::from)
            .io_context(|| format!("Failed to walk {}", from.display()))?;

        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)
            .io_context(|| format!("Unexpected path {}", entry.path().display()))?;
        let target = to.join(relative);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            ensure_dir(&target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).io_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
        } else {
            // Archives we ship never contain links; skip anything exotic.
            trace!("Skipping non-regular entry {}", entry.path().display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_if_exists_handles_missing_file_and_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.txt");
        let dir = tmp.path().join("nested");

        delete_if_exists(&file).unwrap();

        fs::write(&file, "x").unwrap();
        fs::create_dir_all(dir.join("deeper")).unwrap();
        fs::write(dir.join("deeper/b.txt"), "y").unwrap();

        delete_if_exists(&file).unwrap();
        delete_if_exists(&dir).unwrap();

        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn move_dir_renames_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let from = tmp.path().join("from");
        let to = tmp.path().join("sub/to");
        fs::create_dir_all(from.join("src/bin")).unwrap();
        fs::write(from.join("src/bin/app.js"), "// app").unwrap();

        ensure_parent_dir(&to).unwrap();
        move_dir(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(read(&to.join("src/bin/app.js")).unwrap(), b"// app");
    }

    #[test]
    fn copy_dir_recursive_preserves_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let from = tmp.path().join("from");
        let to = tmp.path().join("to");
        fs::create_dir_all(from.join("a/b")).unwrap();
        fs::create_dir_all(from.join("empty")).unwrap();
        fs::write(from.join("a/b/c.txt"), "c").unwrap();
        fs::write(from.join("top.txt"), "top").unwrap();

        copy_dir_recursive(&from, &to).unwrap();

        assert!(to.join("empty").is_dir());
        assert_eq!(fs::read_to_string(to.join("a/b/c.txt")).unwrap(), "c");
        assert_eq!(fs::read_to_string(to.join("top.txt")).unwrap(), "top");
        assert!(from.exists());
    }

    #[test]
    fn read_reports_path_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("version");

        let err = read(&missing).unwrap_err();
        assert!(err.to_string().contains("version"));
    }
}
