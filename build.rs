//! Packs `resources/octorun/` into `$OUT_DIR/octorun.zip` for embedding.
//!
//! Entries are stored under a top-level `octorun/` folder, which is the layout
//! the installer expects after extraction.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const PAYLOAD_DIR: &str = "resources/octorun";
const ARCHIVE_ROOT: &str = "octorun";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={PAYLOAD_DIR}");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let archive_path = out_dir.join("octorun.zip");
    pack_payload(Path::new(PAYLOAD_DIR), &archive_path)?;

    Ok(())
}

fn pack_payload(payload: &Path, archive_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = ZipWriter::new(File::create(archive_path)?);
    writer.add_directory(format!("{ARCHIVE_ROOT}/"), dir_options())?;

    // Sorted walk keeps the archive byte-identical across builds.
    for entry in WalkDir::new(payload).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(payload)?;
        let name = archive_name(relative);

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{name}/"), dir_options())?;
        } else if entry.file_type().is_file() {
            println!("cargo:rerun-if-changed={}", entry.path().display());

            let mode = if relative.starts_with("src/bin") { 0o755 } else { 0o644 };
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(mode);

            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish()?.flush()?;
    Ok(())
}

fn dir_options() -> SimpleFileOptions {
    SimpleFileOptions::default().unix_permissions(0o755)
}

/// Archive names always use `/`, whatever the host separator is
fn archive_name(relative: &Path) -> String {
    let mut name = String::from(ARCHIVE_ROOT);
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
