//! Club Backend server binary.
//!
//! Wires configuration, the PostgreSQL adapters, and the payment provider
//! client into the axum application and serves it.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use club_backend::adapters::http::membership::{membership_router, MembershipAppState};
use club_backend::adapters::postgres::{
    PostgresCustomerDirectory, PostgresMembershipRepository, PostgresSubscriptionLinker,
    PostgresSubscriptionStore,
};
use club_backend::adapters::provider::{HttpPaymentProvider, ProviderConfig};
use club_backend::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    if config.payment.is_test_mode() && config.is_production() {
        warn!("Payment provider is using a TEST credential in production");
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    info!("Connected to PostgreSQL");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let state = MembershipAppState {
        customer_directory: Arc::new(PostgresCustomerDirectory::new(pool.clone())),
        membership_repository: Arc::new(PostgresMembershipRepository::new(pool.clone())),
        subscription_store: Arc::new(PostgresSubscriptionStore::new(pool.clone())),
        subscription_linker: Arc::new(PostgresSubscriptionLinker::new(pool)),
        payment_provider: Arc::new(HttpPaymentProvider::new(ProviderConfig::new(
            config.payment.access_token.clone(),
            config.payment.api_base_url.clone(),
        ))),
        checkout_back_url: config.payment.back_url.clone(),
    };

    let app = Router::new()
        .merge(membership_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    info!(%addr, environment = ?config.server.environment, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
