/// HTTP server for currency context resolution
/// Resolves a per-request currency context and manages user overrides

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use travel_currency_server::{build_router, build_store, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("\n╔════════════════════════════════════════════════════════════╗");
    println!("║        Travel Planner - Currency Context Service           ║");
    println!("╚════════════════════════════════════════════════════════════╝\n");

    let config = ServerConfig::from_env()?;
    let store = build_store(&config)?;

    println!("[INIT] Server configuration:");
    println!("  Port: {}", config.port);
    println!("  Geo header: {}", config.geo_header);
    println!("  User id header: {}", config.user_id_header);
    match &config.preference_store_url {
        Some(url) => println!(
            "  Preference store: {} (table {})",
            url, config.preference_store_table
        ),
        None => println!("  Preference store: in-memory"),
    }

    let port = config.port;
    let app = build_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    println!("\n✓ Currency service running on http://0.0.0.0:{}", port);
    println!("  GET    /api/currency/context     — Resolve currency context");
    println!("  POST   /api/currency/context     — Resolve with request body signals");
    println!("  GET    /api/currency/supported   — List supported currencies");
    println!("  PUT    /api/currency/preference  — Save a currency override");
    println!("  DELETE /api/currency/preference  — Reset to geo detection");
    println!("  GET    /health                   — Check server health\n");

    axum::serve(listener, app).await?;

    Ok(())
}
