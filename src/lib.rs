use anyhow::{bail, Result};
use dotenvy::dotenv;

pub mod ai;
mod api;
mod config;
pub mod extract;
pub mod profile;
mod system_info;

pub use api::{router as api_router, AppState};
pub use config::Config;
pub use extract::{extract, itemize, ParsedPlan, Section, DEFAULT_LABELS};
pub use system_info::get_system_info;

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting plan service...");

    let config = Config::from_env();
    let ai = match config.ai {
        Some(ai) => ai,
        None => bail!("Missing GROQ_API_KEY - set it in the environment or a local .env file"),
    };

    let state = AppState {
        ai,
        labels: config.labels,
        api_token: config.api_token,
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down");
}
