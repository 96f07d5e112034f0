use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::Logger;
use configs::AppConfig;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::subscription::{
    repo::seaorm::SeaOrmSubscriptionRepository,
    repository::SubscriptionRepository,
    SubscriptionService,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the service to a repository; the logger is built once here and handed down.
pub fn build_state(repo: Arc<dyn SubscriptionRepository>, log: Logger) -> AppState {
    AppState { subscriptions: Arc::new(SubscriptionService::new(repo, log)) }
}

pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    routes::build_router(state, build_cors(), request_timeout)
}

/// Resolves on Ctrl+C or SIGTERM, whichever comes first.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Public entry: connect, migrate, build the app and run the HTTP server until Ctrl+C or SIGTERM
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))?;

    // DB connection + one-time forward migration
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;

    let log = Logger::new("server");
    let repo: Arc<dyn SubscriptionRepository> = Arc::new(SeaOrmSubscriptionRepository { db });
    let request_timeout = Duration::from_secs(cfg.server.request_timeout_secs);
    let app = build_app(build_state(repo, log.child("subscriptions")), request_timeout);

    log.span().in_scope(|| info!(%addr, timeout_secs = cfg.server.request_timeout_secs, "starting subscription server"));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("cannot bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}
