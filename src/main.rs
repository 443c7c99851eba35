use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use clorio_vault::config::Settings;
use clorio_vault::error::Result;
use clorio_vault::keys::pallas::PallasKeyDeriver;
use clorio_vault::server::{self, AppState, LockBadge};
use clorio_vault::state::VaultRepository;
use clorio_vault::storage::file::FileStore;

#[derive(Parser)]
#[command(name = "clorio-vault")]
#[command(about = "Encrypted key vault and session lock for the Clorio Mina wallet")]
#[command(version)]
struct Cli {
    /// Directory of the durable storage area
    #[arg(long, global = true, env = "CLORIO_DATA_DIR", default_value = ".clorio")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve UI messages as newline-delimited JSON on stdin/stdout
    Serve,
    /// Show vault status
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries protocol responses
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve => serve(cli.data_dir).await,
        Commands::Status => status(cli.data_dir).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "clorio-vault failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve(data_dir: PathBuf) -> Result<()> {
    let vaults = VaultRepository::new(FileStore::new(&data_dir, "local"));
    let has_vault = vaults.exists().await?;
    info!(
        has_vault,
        data_dir = %data_dir.display(),
        "Starting message host"
    );

    // Starts locked; the UI reports lock changes with UPDATE_LOCK_STATUS.
    let badge = Arc::new(LockBadge::default());
    server::serve_stdio(AppState::new(Arc::new(PallasKeyDeriver), badge)).await
}

async fn status(data_dir: PathBuf) -> Result<()> {
    let store = FileStore::new(&data_dir, "local");
    let settings = Settings::load(&store).await?;
    let vaults = VaultRepository::new(store);

    println!("Data file:  {}", vaults.store().path().display());
    match vaults.load().await? {
        Some(record) => {
            println!("Vault:      present ({:?})", record.secret_type);
            println!("Version:    {}", record.version);
            if let Some(created) = record.created_at() {
                println!("Created:    {}", created.to_rfc3339());
            }
        }
        None => println!("Vault:      none"),
    }
    println!("Auto-lock:  {}", settings.auto_lock_timeout);
    Ok(())
}
