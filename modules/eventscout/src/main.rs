use std::path::PathBuf;
use std::sync::Arc;

use ai_client::{Claude, Completion, Gemini};
use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use eventscout::catalog::JsonCatalogStore;
use eventscout::scout::Scout;
use eventscout_common::config::load_config;
use eventscout_common::{AiProvider, AppConfig, FileConfig};

#[derive(Parser)]
#[command(name = "eventscout", about = "Refresh the local events catalog from web search")]
struct Cli {
    /// Path to config TOML file. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the catalog path from the config file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::from_default_env().add_directive("eventscout=info".parse()?);
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Event scout starting...");

    let mut file_config = match &cli.config {
        Some(path) => {
            info!(config = %path.display(), "Loading config");
            load_config(path)?
        }
        None => FileConfig::default(),
    };
    if let Some(path) = cli.catalog {
        file_config.catalog.path = path;
    }

    let config = AppConfig::from_env()?;
    config.log_redacted();

    let ai = completion_client(&config, &file_config);
    let store = Arc::new(JsonCatalogStore::new(file_config.catalog.path.clone()));
    info!(path = %store.path().display(), "Using catalog");

    let report = Scout::from_config(&file_config, ai, store)?.run().await?;

    info!("{}", report.stats);
    Ok(())
}

fn completion_client(config: &AppConfig, file_config: &FileConfig) -> Arc<dyn Completion> {
    let timeout = file_config.verification.timeout();
    match config.provider {
        AiProvider::Gemini => {
            let model = config.model.as_deref().unwrap_or(ai_client::gemini::DEFAULT_MODEL);
            Arc::new(Gemini::new(&config.api_key, model).with_timeout(timeout))
        }
        AiProvider::Claude => {
            let model = config.model.as_deref().unwrap_or(ai_client::claude::DEFAULT_MODEL);
            Arc::new(Claude::new(&config.api_key, model).with_timeout(timeout))
        }
    }
}
