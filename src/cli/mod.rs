//! CLI module for inspecting and repairing volume metadata
//!
//! Provides subcommands mirroring the repository operations:
//! - `get`: print one volume record
//! - `list`: print every volume record
//! - `set`: write a volume record
//! - `delete`: remove a volume record

pub mod volume;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::AppConfig;
use crate::infrastructure::kv::KvStoreFactory;
use crate::infrastructure::logging;
use crate::infrastructure::volume::KvVolumeRepository;

/// RBD volume metadata stored in Consul
#[derive(Parser)]
#[command(name = "rbd-volume-store")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a volume record (empty name when absent)
    Get {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print all volume records keyed by name
    List,

    /// Create or overwrite a volume record
    Set(volume::SetArgs),

    /// Delete a volume record
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Loads configuration, connects to the store and runs the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let repository = build_repository(&config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Get { name } => volume::get(&repository, &name, &mut out).await,
        Command::List => volume::list(&repository, &mut out).await,
        Command::Set(args) => volume::set(&repository, args, &mut out).await,
        Command::Delete { name } => volume::delete(&repository, &name, &mut out).await,
    }
}

fn build_repository(config: &AppConfig) -> anyhow::Result<KvVolumeRepository> {
    let store_config = config.store.to_store_config()?;
    debug!(backend = %store_config.store_type(), "Connecting to store");

    let store = KvStoreFactory::connect(&store_config)?;
    let repository = KvVolumeRepository::new(store);

    Ok(match config.store.operation_timeout() {
        Some(timeout) => repository.with_timeout(timeout),
        None => repository,
    })
}
