//! Demand forecast HTTP server.
//!
//! Initializes the repository, seeds sample history into an empty store and
//! serves the dashboard API.
//!
//! # Usage
//!
//! ```bash
//! # In-memory repository (default)
//! cargo run --bin forecast-server
//!
//! # SQLite repository
//! REPOSITORY_TYPE=sqlite SQLITE_PATH=sales_data.db \
//!   cargo run --bin forecast-server --features sqlite-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5003)
//! - `REPOSITORY_TYPE`: `local` or `sqlite` (ignored when a `repository.toml` is found)
//! - `SQLITE_PATH` / `DATABASE_URL`: SQLite database file
//! - `FORECAST_SEED`: fixed RNG seed for reproducible forecasts
//! - `SEED_SAMPLE_DATA`: generate a year of history when the store is empty (default: true)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use demand_forecast::config::AppConfig;
use demand_forecast::db;
use demand_forecast::http::{create_router, AppState};
use demand_forecast::services::sample_data::DEFAULT_SAMPLE_DAYS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting demand forecast server");

    let config = AppConfig::from_env().context("Invalid server configuration")?;

    // repository.toml takes precedence over the environment
    let file_config = db::RepositoryConfig::from_default_location()
        .context("Failed to load repository.toml")?;
    let repository = match &file_config {
        Some(file) => db::RepositoryFactory::from_config(file).await?,
        None => {
            db::init_repository()?;
            Arc::clone(db::get_repository()?)
        }
    };
    info!("Repository initialized successfully");

    let seed_sample_data = file_config
        .as_ref()
        .and_then(|file| file.repository.seed_sample_data)
        .unwrap_or(config.seed_sample_data);
    if seed_sample_data {
        let today = chrono::Local::now().date_naive();
        let mut rng = config.rng();
        let seeded = db::seed_sample_data_if_empty(
            repository.as_ref(),
            today,
            DEFAULT_SAMPLE_DAYS,
            &mut rng,
        )
        .await?;
        if seeded > 0 {
            info!("Seeded {} days of sample data", seeded);
        }
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;

    let state = AppState::with_config(repository, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
