mod app;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use fintrack_client::{Api, FileStorage, SessionStore};

use crate::{config::AppConfig, error::Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    let storage = FileStorage::open(&config.state_path)?;
    let api = Api::new(&config.base_url, config.timeout(), SessionStore::new(storage))?;
    tracing::info!("fintrack_tui started against {}", api.gateway().base_url());

    let mut app = app::App::new(&config, api);
    app.run().await?;
    Ok(())
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "fintrack_tui={level},fintrack_client={level}",
            level = config.level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
