//! feedd — the fishfeed daemon.
//!
//! Single binary that owns the reference bracket store, the prediction
//! model handle, and the web server:
//! - `serve`: HTML calculator + JSON API
//! - `seed`: load reference brackets from a TOML file
//! - `brackets`: dump the loaded brackets as JSON
//!
//! # Usage
//!
//! ```text
//! feedd seed --file data/brackets.toml
//! feedd serve --port 8001 --model data/feed_model.json
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use fishfeed_core::{BracketSeed, FishfeedConfig};
use fishfeed_dashboard::DashboardState;
use fishfeed_model::ModelHandle;
use fishfeed_store::BracketStore;

const DEFAULT_CONFIG: &str = "fishfeed.toml";

#[derive(Parser)]
#[command(name = "feedd", about = "fishfeed daemon")]
struct Cli {
    /// Path to fishfeed.toml. Defaults to ./fishfeed.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the bracket database.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the web interface and JSON API.
    Serve {
        /// Address to bind.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Exported prediction model (JSON weights).
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Validate and load reference brackets from a TOML seed file.
    Seed {
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the loaded reference brackets as JSON.
    Brackets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,feedd=debug,fishfeed=debug")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    match cli.command {
        Command::Serve { bind, port, model } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(model) = model {
                config.model.path = model;
            }
            run_serve(config).await
        }
        Command::Seed { file } => run_seed(&config, &file),
        Command::Brackets => run_brackets(&config),
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<FishfeedConfig> {
    match explicit {
        Some(path) => FishfeedConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            FishfeedConfig::from_file(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("loading config {DEFAULT_CONFIG}"))
        }
        None => Ok(FishfeedConfig::default()),
    }
}

fn open_store(config: &FishfeedConfig) -> anyhow::Result<BracketStore> {
    std::fs::create_dir_all(&config.storage.data_dir)
        .with_context(|| format!("creating {}", config.storage.data_dir.display()))?;
    let db_path = config.database_path();
    let store = BracketStore::open(&db_path)?;
    info!(path = ?db_path, "bracket store opened");
    Ok(store)
}

async fn run_serve(config: FishfeedConfig) -> anyhow::Result<()> {
    info!("fishfeed daemon starting");

    let store = open_store(&config)?;
    let brackets = store.count()?;
    if brackets == 0 {
        warn!("no reference brackets loaded; run `feedd seed --file <brackets.toml>`");
    } else {
        info!(brackets, "reference brackets available");
    }

    // Load once up front; a missing model only disables predictions.
    let model = ModelHandle::new(&config.model.path);
    if let Err(e) = model.warm().await {
        warn!(
            path = ?model.path(),
            error = %e,
            "prediction model not loaded; /predict/ will answer 503 until it is"
        );
    }

    let router = fishfeed_api::build_router(DashboardState::new(store, model));
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;

    info!(%addr, "HTTP server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to install CTRL+C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("fishfeed daemon stopped");
    Ok(())
}

fn run_seed(config: &FishfeedConfig, file: &Path) -> anyhow::Result<()> {
    let seed = BracketSeed::from_file(file)?;
    let store = open_store(config)?;
    let written = store.seed(&seed.brackets)?;
    info!(written, total = store.count()?, file = ?file, "brackets seeded");
    Ok(())
}

fn run_brackets(config: &FishfeedConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let brackets = store.list_brackets()?;
    println!("{}", serde_json::to_string_pretty(&brackets)?);
    Ok(())
}
