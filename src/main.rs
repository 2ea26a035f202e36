use actix::Actor;
use actix_web::{middleware::Logger, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod actors;
mod config;
mod db;
mod domain;
mod metrics;
mod utils;
mod web;

use actors::HealthCheckActor;
use config::AppConfig;
use domain::order::{EngineConfig, OrderPricingEngine};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging, overridable with RUST_LOG
    // Example: RUST_LOG=food_ordering=trace cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,food_ordering=debug")),
        )
        .init();

    tracing::info!("🚀 Starting food ordering service");

    // === 1. Configuration ===
    let config = AppConfig::from_env()?;

    // === 2. Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);

    // === 3. Backends (catalog, order store, promo validator) ===
    let backends = db::build(&config).await?;

    // === 4. Pricing engine ===
    let engine = Arc::new(OrderPricingEngine::new(
        backends.catalog.clone(),
        backends.promos,
        backends.store,
        EngineConfig {
            call_timeout: config.call_timeout,
        },
    ));

    // === 5. Health monitoring ===
    let health = HealthCheckActor::new(backends.probes, metrics.clone(), config.health_interval).start();

    let state = web::AppState {
        engine,
        catalog: backends.catalog,
        metrics,
        health,
        api_key: Arc::from(config.api_key.as_str()),
    };

    // === 6. HTTP server ===
    tracing::info!(
        host = %config.server_host,
        port = config.server_port,
        "📡 Listening on http://{}:{}",
        config.server_host,
        config.server_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(state.clone()))
            .wrap(web::cors())
            .wrap(Logger::default())
            .configure(web::configure)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
