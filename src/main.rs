//! # storygate
//!
//! Service binary: loads settings, installs logging, opens the database and
//! either serves HTTP or only prepares the schema.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storygate_settings::{DEFAULT_SETTINGS_FILE, StorygateSettings};
use storygate_store::{ConnectionConfig, Store};
use tracing::info;

/// Gated story reveal service.
#[derive(Parser, Debug)]
#[command(name = "storygate", version, about = "Gated story reveal service")]
struct Cli {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Serve HTTP until Ctrl-C or SIGTERM (default).
    Serve,
    /// Create or migrate the database, seed the story, then exit.
    InitDb,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn open_store(settings: &StorygateSettings) -> Result<Store> {
    let path = &settings.database.path;
    ensure_parent_dir(Path::new(path))?;
    let config = ConnectionConfig {
        pool_size: settings.database.pool_size,
        ..ConnectionConfig::default()
    };
    let pool = storygate_store::new_file(path, &config)
        .with_context(|| format!("Failed to open database: {path}"))?;
    Ok(Store::new(pool))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = storygate_settings::load_settings_from_path(&cli.config)
        .with_context(|| format!("Failed to load settings: {}", cli.config.display()))?;
    storygate_logging::init_logging(&settings.logging).context("Failed to initialize logging")?;

    let store = open_store(&settings)?;
    let applied = store.initialize().context("Failed to run migrations")?;
    info!(applied, path = %settings.database.path, "database ready");

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => {
            println!("applied {applied} migration(s) to {}", settings.database.path);
            Ok(())
        }
        Command::Serve => storygate_server::serve(settings, store)
            .await
            .context("Server failed"),
    }
}
