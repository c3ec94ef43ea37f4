//! DTE Report API Server
//!
//! Main entry point for the DTE report backend service.

use std::sync::Arc;

use anyhow::Context;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dte_reports_api::{AppState, create_router};
use dte_reports_db::connect;
use dte_reports_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dte_reports=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Resolve the store-local time zone used for date filters and exports
    let timezone: Tz = config
        .report
        .timezone
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid report timezone {:?}: {e}", config.report.timezone))?;
    info!(%timezone, "Report time zone configured");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        timezone,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
