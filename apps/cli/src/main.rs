//! BitSpring publisher entry point.

mod config;
mod host;
mod renderer;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bitspring_client::ApiClient;
use bitspring_publish::{PublishError, PublishEvent, PublishOrchestrator};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::PublisherConfig;
use host::ConsoleHost;
use renderer::CopyRenderer;

/// Upload a PDF to a new BitSpring space and open the link.
#[derive(Debug, Parser)]
#[command(name = "bitspring", version, about, long_about = None)]
struct Cli {
    /// PDF document to publish
    document: PathBuf,

    /// Name of the uploaded file (defaults to the document's file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the space link instead of opening a browser
    #[arg(long)]
    no_browser: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        // Publish errors were already shown by the host.
        if e.downcast_ref::<PublishError>().is_none() {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = PublisherConfig::load(cli.config.as_deref()).context("failed to load config")?;
    tracing::info!(api = %cfg.api_base_url, "configuration loaded");

    let client = ApiClient::http(&cfg.api_base_url, cfg.request_timeout())
        .context("failed to create HTTP client")?;
    let mut publish_config = cfg.publish_config();
    if cli.no_browser {
        publish_config.open_browser = false;
    }

    let mut orchestrator = PublishOrchestrator::new(
        client,
        Arc::new(CopyRenderer),
        Arc::new(ConsoleHost),
        publish_config,
    );

    if let Some(mut events) = orchestrator.take_events() {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let PublishEvent::StateChanged { state, .. } = event {
                    tracing::debug!(?state, "publish state");
                }
            }
        });
    }

    tracing::debug!(
        workspace = %orchestrator.config().workspace_dir,
        open_browser = orchestrator.config().open_browser,
        "publisher ready"
    );

    let cancel = orchestrator.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = match cli.name.as_deref() {
        Some(name) => orchestrator.publish_as(&cli.document, name).await?,
        None => orchestrator.publish(&cli.document).await?,
    };
    tracing::info!(url = %outcome.url, bytes = outcome.bytes, "published");
    Ok(())
}
