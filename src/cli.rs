use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "octorun-install", version, about = "Install the bundled octorun runtime")]
pub struct Args {
    /// Cache root (overrides config file and OCTORUN_CACHE_DIR)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Sub‑commands (ensure, status, paths)
    #[command(subcommand)]
    pub sub: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Extract octorun if needed and print the executable path (default)
    Ensure,
    /// Report the install state (Exit 0 = installed, 1 = missing or stale)
    Status,
    /// Print the derived install paths
    Paths,
}
