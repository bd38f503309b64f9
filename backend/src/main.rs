//! Main entry point for the authentication service.
//!
//! This file initializes the Axum web server, sets up the database
//! connection, and registers all API routes and middleware. It orchestrates
//! the application's startup and defines its overall structure.

mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use axum::{Extension, Router, response::Json, routing::get};
use config::{AuthConfig, Config};
use database::Database;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.run_migrations().await?;
    let pool = db.pool().clone();

    let app = build_app(pool, config.auth.clone());

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!(
        "auth service {} listening on {}",
        env!("CARGO_PKG_VERSION"),
        bind_address
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Assembles the router with the shared pool, auth configuration, and the
/// request-boundary middleware. The panic-catching layer is outermost so
/// any fault during request processing is converted into a generic 500.
fn build_app(pool: SqlitePool, auth_config: AuthConfig) -> Router {
    Router::new()
        .route("/healthcheck", get(healthcheck))
        .nest("/v1", auth::routes::auth_router())
        .layer(Extension(pool))
        .layer(Extension(auth_config))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(errors::handle_panic))
}

async fn healthcheck() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received, stopping server");
}
