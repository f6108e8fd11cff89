//! # Tablekeep API Server
//!
//! HTTP API for restaurant table reservations with token-based
//! authentication and a two-tier (admin / owner-only) authorization model.
//!
//! ## Architecture
//!
//! The server is built with Axum and provides:
//! - Account endpoints (register, login, logout, me)
//! - Reservation CRUD gated by the admin-or-owner rule
//! - Opaque bearer tokens stored as SHA-256 hashes
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/tablekeep cargo run -p tablekeep-api
//! ```

use tablekeep_api::{
    app::{build_router, AppState},
    config::Config,
};
use tablekeep_shared::db::{migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablekeep_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Tablekeep API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database pool
    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    // Run pending migrations
    migrations::run_migrations(&db).await?;

    // Build Axum application
    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
