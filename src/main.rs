mod app;
mod config;
mod generate;
mod project;
mod store;
mod tui;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::generate::client::{GenerationClient, HttpGeminiClient};
use crate::store::ProjectStore;

#[derive(Parser)]
#[command(name = "prdforge", about = "AI-assisted PRD and app-icon project manager")]
struct Cli {
    /// Override the data directory (default: ~/.prdforge)
    #[arg(long)]
    data_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = config::Config::from_env(cli.data_dir);

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory: {}", config.data_dir.display())
    })?;

    // Log to a file so tracing output does not tear the TUI
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .with_context(|| format!("failed to open log file: {}", config.log_path().display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("prdforge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .build()
        .context("failed to build HTTP client")?;

    let client: Option<Arc<dyn GenerationClient>> = config.api_key.clone().map(|key| {
        Arc::new(HttpGeminiClient::new(http_client.clone(), key)) as Arc<dyn GenerationClient>
    });
    if client.is_none() {
        tracing::warn!("GEMINI_API_KEY not set, AI generation disabled");
    }

    let store = ProjectStore::load(config.store_path());
    let app = App::new(store, config.model_tag(), client.is_some());
    let models = tui::Models {
        text: config.text_model.clone(),
        image: config.image_model.clone(),
    };

    tui::run(app, client, models).await?;
    Ok(())
}
