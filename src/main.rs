mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use octorun_installer::install::{InstallationState, OctorunInstaller};
use octorun_installer::InstallerConfig;
use tokio_util::sync::CancellationToken;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    match rt.block_on(real_main()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{e:#}");
            std::process::exit(1);
        }
    }
}

async fn real_main() -> Result<i32> {
    let args = cli::Args::parse();

    let mut config = InstallerConfig::load_or_default(args.config.as_deref())
        .context("Failed to load installer configuration")?;
    if let Some(cache_dir) = args.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }

    let details = config
        .install_details()
        .context("Failed to prepare cache directory")?;

    let token = CancellationToken::new();
    let installer = OctorunInstaller::new(details, token.clone());

    match args.sub.unwrap_or(cli::Cmd::Ensure) {
        cli::Cmd::Ensure => handle_ensure(&installer, token).await,
        cli::Cmd::Status => handle_status(&installer),
        cli::Cmd::Paths => handle_paths(&installer),
    }
}

/// Handle ensure command - install if needed and print the executable path
async fn handle_ensure(installer: &OctorunInstaller, token: CancellationToken) -> Result<i32> {
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling extraction");
            token.cancel();
        }
    });

    let result = installer
        .ensure_installed()
        .await
        .context("Failed to install octorun");
    ctrl_c.abort();

    match result? {
        Some(path) => {
            info!("octorun ready");
            println!("{}", path.display());
            Ok(0)
        }
        None => {
            eprintln!("octorun could not be installed");
            Ok(1)
        }
    }
}

/// Handle status command - Exit 0 = installed, 1 = missing or stale
fn handle_status(installer: &OctorunInstaller) -> Result<i32> {
    let state = installer
        .installation_state()
        .context("Failed to inspect octorun install")?;

    match state {
        InstallationState::Installed => {
            println!(
                "octorun {} installed at {}",
                installer.details().expected_version(),
                installer.details().install_path().display()
            );
            Ok(0)
        }
        InstallationState::NotInstalled => {
            println!("octorun is not installed");
            Ok(1)
        }
        InstallationState::MissingVersion => {
            println!("octorun install has no version marker");
            Ok(1)
        }
        InstallationState::Outdated { found } => {
            println!(
                "octorun {} is outdated (expected {})",
                found,
                installer.details().expected_version()
            );
            Ok(1)
        }
    }
}

/// Handle paths command - print every derived path
fn handle_paths(installer: &OctorunInstaller) -> Result<i32> {
    let details = installer.details();
    println!("cache:      {}", details.base_cache_path().display());
    println!("downloads:  {}", details.download_path().display());
    println!("archive:    {}", details.archive_file().display());
    println!("install:    {}", details.install_path().display());
    println!("executable: {}", details.executable_path().display());
    println!("version:    {}", details.version_file().display());
    Ok(0)
}
