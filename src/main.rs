//! Server entry point.

use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use studio_ledger::{api, config, core, errors::Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and create tables
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed the service catalog. A missing config.toml is not fatal; the
    //    catalog can be populated through the API instead.
    match config::catalog::load_default_config() {
        Ok(catalog) => config::catalog::seed_catalog(&db, &catalog).await?,
        Err(e) => warn!("Skipping catalog seed: {e}"),
    }

    // 5. Close any expense pocket budget periods that ended while the
    //    server was down.
    let today = Utc::now().date_naive();
    let closed = core::budget::close_due_budget_periods(&db, today).await?;
    if !closed.is_empty() {
        info!(count = closed.len(), "closed overdue budget periods");
    }

    // 6. Serve the API
    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let app = api::router(api::AppState { db });
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
