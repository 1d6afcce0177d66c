mod bot;
mod config;
mod controller;
mod data;
mod error;
mod graph;
mod model;
mod router;
mod service;
mod startup;
mod state;

use dioxus_logger::tracing::{self, Level};

use crate::{config::Config, error::AppError, state::AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    dioxus_logger::init(Level::INFO)
        .map_err(|e| AppError::InternalError(format!("Failed to initialize logger: {}", e)))?;

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    tracing::info!("Starting guildprint");

    // Keep-alive endpoint runs alongside the bot
    let port = config.http_port;
    let state = AppState::new(db.clone());
    tokio::spawn(async move {
        if let Err(e) = startup::serve_health(port, state).await {
            tracing::error!("Health endpoint on port {} failed: {}", port, e);
        }
    });

    bot::start::start_bot(&config, db).await
}
