//! Fintrack API Server
//!
//! Main entry point for the personal finance backend.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_api::{AppState, create_router};
use fintrack_db::connect_with_pool;
use fintrack_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintrack=debug,tower_http=debug".into()),
        )
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await
    .context("failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        allow_admin_signup: config.auth.allow_admin_signup,
        default_currency: Arc::from(config.export.default_currency.as_str()),
    };
    if state.allow_admin_signup {
        info!("ADMIN role may be requested at signup");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
