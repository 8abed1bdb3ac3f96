use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use common::utils::logging::init_logging_with_format;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmAdminRepository;
use service::auth::{AuthService, AuthSettings};
use service::cache::StorefrontCache;
use service::media::{LocalMediaStore, MediaStore};
use service::payment::{PaymentGateway, SslCommerzGateway};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire services for an already connected database.
pub fn build_state(db: DatabaseConnection, cfg: AppConfig) -> anyhow::Result<ServerState> {
    let auth = Arc::new(AuthService::new(
        Arc::new(SeaOrmAdminRepository { db: db.clone() }),
        AuthSettings::from(&cfg.auth),
    ));
    let media: Arc<dyn MediaStore> = Arc::new(LocalMediaStore::from_config(&cfg.media));
    let gateway: Option<Arc<dyn PaymentGateway>> = match &cfg.payment.sslcommerz {
        Some(sc) => Some(Arc::new(SslCommerzGateway::new(sc)?)),
        None => {
            warn!(event = "gateway_disabled", "payment.sslcommerz not configured; only cash on delivery is accepted");
            None
        }
    };
    Ok(ServerState {
        db,
        auth,
        cache: StorefrontCache::from_config(&cfg.cache),
        media,
        gateway,
        config: Arc::new(cfg),
    })
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

async fn bootstrap_admin(state: &ServerState) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (&state.config.auth.bootstrap_email, &state.config.auth.bootstrap_password) else {
        return Ok(());
    };
    if let Some(admin) = state.auth.bootstrap_admin(email, password).await? {
        info!(event = "admin_bootstrapped", admin_id = %admin.id, email = %admin.email);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; shutdown only on process kill");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: load config, prepare the database, and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().context("loading configuration")?;
    init_logging_with_format(&cfg.server.log_format);

    common::env::ensure_media_root(&cfg.media.root, &cfg.media.public_base_url).await?;

    let db = models::db::connect_with_config(&cfg.database).await.context("connecting to database")?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await.context("running migrations")?;
        info!(event = "migrations_applied");
    }

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    let state = build_state(db, cfg)?;
    bootstrap_admin(&state).await?;
    let app = build_app(state);

    info!(%addr, "starting storefront server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!(event = "server_stopped");
    Ok(())
}
