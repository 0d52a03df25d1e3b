//! # DocAsk: PDF document question answering
//!
//! Upload PDFs, then ask questions about their content over HTTP or a
//! WebSocket session. Answers come from a hosted extractive-QA inference API,
//! fed the chunk of document text most similar to the question.
//!
//! Usage:
//!   docask                        # Start the server (default 127.0.0.1:8000)
//!   docask --port 9000            # Custom port
//!   docask --config ./docask.toml # Explicit config file

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docask_core::DocaskConfig;

#[derive(Parser)]
#[command(
    name = "docask",
    version,
    about = "PDF document question-answering service"
)]
struct Cli {
    /// Path to the config file (default: ~/.docask/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the document database path
    #[arg(long)]
    db_path: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env before config so HUGGINGFACEHUB_TOKEN from a local file is seen.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        "docask=debug,tower_http=debug"
    } else {
        "docask=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            DocaskConfig::load_from(std::path::Path::new(&shellexpand::tilde(path).to_string()))?
        }
        None => DocaskConfig::load()?,
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = db_path;
    }

    if config.inference.api_token.is_empty() {
        tracing::warn!(
            "No inference API token configured (HUGGINGFACEHUB_TOKEN); \
             question answering will report authorization errors"
        );
    }

    tracing::info!(
        "Starting DocAsk v{} (db: {})",
        env!("CARGO_PKG_VERSION"),
        config.db_path().display()
    );

    docask_gateway::start(&config).await?;
    Ok(())
}
