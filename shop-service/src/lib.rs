pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    rate_limit::{ip_rate_limit_middleware, IpRateLimiter},
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ShopConfig;
use crate::services::{AuthService, MongoDb, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub config: ShopConfig,
    pub db: MongoDb,
    pub tokens: TokenService,
    pub auth_service: AuthService,
    pub login_rate_limiter: IpRateLimiter,
    pub register_rate_limiter: IpRateLimiter,
    pub ip_rate_limiter: IpRateLimiter,
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Login and register carry their own, tighter limits on top of the
    // global one
    let login_limiter = state.login_rate_limiter.clone();
    let login_route = Router::new()
        .route("/api/auth/login", post(handlers::auth::login))
        .layer(from_fn_with_state(login_limiter, ip_rate_limit_middleware));

    let register_limiter = state.register_rate_limiter.clone();
    let register_route = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .layer(from_fn_with_state(
            register_limiter,
            ip_rate_limit_middleware,
        ));

    // Everything under /api/users requires a valid access token
    let account_routes = Router::new()
        .route(
            "/api/users/me",
            get(handlers::users::get_profile).put(handlers::users::update_profile),
        )
        .route("/api/users/address", post(handlers::users::create_address))
        .route(
            "/api/users/address/:address_id",
            axum::routing::put(handlers::users::update_address)
                .delete(handlers::users::delete_address),
        )
        .route(
            "/api/users/wishlist",
            get(handlers::wishlist::get_wishlist).post(handlers::wishlist::add_to_wishlist),
        )
        .route(
            "/api/users/wishlist/:product_id",
            axum::routing::delete(handlers::wishlist::remove_from_wishlist),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(login_route)
        .merge(register_route)
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/products", get(handlers::products::list_products))
        .route(
            "/api/products/search",
            get(handlers::products::search_products),
        )
        .route(
            "/api/products/category/:slug",
            get(handlers::products::products_by_category),
        )
        .route(
            "/api/products/:slug",
            get(handlers::products::product_by_slug),
        )
        .route(
            "/api/categories",
            get(handlers::categories::list_categories),
        )
        .route(
            "/api/categories/tree",
            get(handlers::categories::category_tree),
        )
        .merge(account_routes)
        .with_state(state.clone())
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer. Credentials must be allowed for the refresh
        // cookie to travel cross-origin.
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .filter_map(|o| match o.parse::<HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(e) => {
                                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                                None
                            }
                        })
                        .collect::<Vec<HeaderValue>>(),
                )
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_credentials(true),
        );

    Ok(app)
}

/// Service health check
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "MongoDB health check failed");
        e
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "mongodb": "up"
        }
    })))
}
