mod config_cmd;
mod replay_cmd;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use linestash_config::{StashConfig, StorageBackend};
use linestash_gateway::{Dispatcher, router, start_server};

#[derive(Parser)]
#[command(name = "linestash")]
#[command(about = "LINE webhook bot that keeps shared media in object storage")]
#[command(version)]
struct Cli {
    /// Config file; falls back to LINESTASH_CONFIG, then the user config dir
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Store objects under this directory instead of the configured backend
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
    /// Run one recorded proxy event through the dispatcher and print the response
    Replay {
        /// JSON file holding `headers` and `body`
        event: PathBuf,
        /// Store objects under this directory instead of the configured backend
        #[arg(long)]
        store_dir: Option<PathBuf>,
    },
    /// Print the x-line-signature value for a request body ("-" reads stdin)
    Sign { body: PathBuf },
    /// Print the effective config with secrets masked, then validate it
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = linestash_config::config_file_path(cli.config.as_deref());
    let env: HashMap<String, String> = std::env::vars().collect();
    let config = linestash_config::prepare_with(path.as_deref(), &env).await?;

    linestash_logging::init_logger(
        config.logging.dir.as_deref(),
        &config.logging.level,
        config.logging.json,
    )
    .context("Failed to open the log directory (logging.dir)")?;

    match cli.command {
        Commands::Serve { port, store_dir } => {
            let mut config = with_store_dir(config, store_dir);
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(linestash_config::ensure_valid(config)?).await?;
        }
        Commands::Replay { event, store_dir } => {
            let config = linestash_config::ensure_valid(with_store_dir(config, store_dir))?;
            replay_cmd::run(&config, &event).await?;
        }
        Commands::Sign { body } => config_cmd::sign(&config, &body).await?,
        Commands::CheckConfig => config_cmd::check(&config, path.as_deref())?,
    }

    Ok(())
}

fn with_store_dir(mut config: StashConfig, store_dir: Option<PathBuf>) -> StashConfig {
    if let Some(dir) = store_dir {
        config.storage.backend = StorageBackend::Local;
        config.storage.local_dir = Some(dir);
    }
    config
}

async fn run_server(config: StashConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;

    info!(
        addr = %addr,
        path = %config.server.webhook_path,
        storage = ?config.storage.backend,
        "Starting linestash"
    );

    let dispatcher = Arc::new(Dispatcher::from_config(&config).await?);
    let app = router(dispatcher, &config.server.webhook_path);
    start_server(addr, app).await
}

/// Read a file, or stdin when the path is `-`.
async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await.context("Failed to read stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
