use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use weekly_planner_api::data::memory::InMemoryStore;
use weekly_planner_api::data::sqlite::SqliteStore;
use weekly_planner_api::infrastructure::config::AppConfig;
use weekly_planner_api::infrastructure::database::{DatabaseConfig, create_pool};
use weekly_planner_api::infrastructure::logging::init_logging;
use weekly_planner_api::presentation::handlers::AppState;
use weekly_planner_api::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use weekly_planner_api::presentation::routes::{ROUTES, configure_api};

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    init_logging();
    info!("Logging initialized successfully");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        allowed_origin = %config.allowed_origin,
        "Configuration loaded"
    );

    let state = match &config.database_url {
        Some(url) => {
            let db_config = DatabaseConfig {
                max_connections: config.database_max_connections,
                ..DatabaseConfig::new(url.clone())
            };
            let pool = create_pool(&db_config)
                .await
                .context("Failed to open the SQLite database")?;
            info!("Using SQLite store");
            AppState::new(Arc::new(SqliteStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set, data will not survive a restart");
            AppState::new(Arc::new(InMemoryStore::new()))
        }
    };
    let state = web::Data::new(state);
    info!("Application state initialized");

    let allowed_origin = config.allowed_origin.clone();
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allow_any_method()
            .allow_any_header();
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .configure(configure_api(state.clone()))
    });

    let bind_addr = config.bind_address();
    let server = server
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!(address = %bind_addr, routes = %ROUTES, "Starting HTTP server");

    server.run().await?;
    Ok(())
}
