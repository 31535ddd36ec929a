use std::net::SocketAddr;

use axum::Router;
use common::{env::ensure_upload_dir, utils::logging::init_logging};
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}:{}: {e}", cfg.host, cfg.port)))
}

/// Router over an existing connection; no I/O besides what requests do.
pub fn build_app(cfg: &configs::AppConfig, db: DatabaseConnection) -> Router {
    let state = ServerState::new(db, cfg);
    routes::build_router(state, build_cors())
}

/// Public entry: load config, migrate, build the app and serve.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = configs::AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(cfg.logging.is_json());

    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await.map_err(anyhow::Error::from)?;
    info!(event = "migrations_applied", "database schema up to date");

    ensure_upload_dir(&cfg.uploads.dir).await?;

    let app = build_app(&cfg, db);
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, event = "listening", "starting job tracker api");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}
