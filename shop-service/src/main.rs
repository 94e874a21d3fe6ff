use service_core::error::AppError;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use service_core::observability::init_tracing;
use std::net::SocketAddr;

use shop_service::config::ShopConfig;
use shop_service::services::{AuthService, MongoDb, TokenService};
use shop_service::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ShopConfig::from_env()?;
    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting shop-service"
    );

    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database).await?;
    db.initialize_indexes().await?;

    let tokens = TokenService::new(&config.jwt)?;
    let auth_service = AuthService::new(db.clone(), tokens.clone());

    let state = AppState {
        login_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.login_attempts,
            config.rate_limit.login_window_seconds,
        ),
        register_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.register_attempts,
            config.rate_limit.register_window_seconds,
        ),
        ip_rate_limiter: create_ip_rate_limiter(
            config.rate_limit.global_ip_limit,
            config.rate_limit.global_ip_window_seconds,
        ),
        config: config.clone(),
        db,
        tokens,
        auth_service,
    };

    let app = build_router(state).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
