//! Coffer API Server
//!
//! Main entry point for the Coffer backend service.

use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffer_api::{AppState, create_router};
use coffer_core::CoreContext;
use coffer_shared::{AppConfig, SessionTokenService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    info!("Connected to database");

    // Built once; every request shares this enforcer.
    let core = CoreContext::initialize(coffer_db::stores(&db), config.workflow.clone()).await?;
    info!("Policy enforcer loaded");

    let sessions = SessionTokenService::new(&config.session);
    let state = AppState::new(core, sessions, &config.session.cookie_name);
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
