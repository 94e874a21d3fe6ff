#![allow(dead_code)]

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, Response};
use axum::Router;
use service_core::config as core_config;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use std::net::SocketAddr;
use uuid::Uuid;

use shop_service::config::{
    Environment, JwtConfig, MongoConfig, RateLimitConfig, SecurityConfig, ShopConfig,
};
use shop_service::services::{AuthService, MongoDb, TokenService};
use shop_service::{build_router, AppState};

pub const TEST_USER_AGENT: &str = "integration-test/1.0";

pub struct TestApp {
    pub app: Router,
    pub db: MongoDb,
    pub tokens: TokenService,
    pub config: ShopConfig,
    db_name: String,
}

pub async fn spawn_app() -> TestApp {
    let uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let db_name = format!("test_shop_{}", Uuid::new_v4().simple());

    let config = ShopConfig {
        common: core_config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "shop-service".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        mongodb: MongoConfig {
            uri: uri.clone(),
            database: db_name.clone(),
        },
        jwt: JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_minutes: 90,
            refresh_token_expiry_days: 30,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            register_attempts: 1000,
            register_window_seconds: 60,
            global_ip_limit: 10_000,
            global_ip_window_seconds: 60,
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init();

    let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
        .await
        .expect("Failed to connect to MongoDB");
    db.initialize_indexes()
        .await
        .expect("Failed to initialize indexes");

    let tokens = TokenService::new(&config.jwt).expect("Failed to create token service");
    let auth_service = AuthService::new(db.clone(), tokens.clone());

    let state = AppState {
        config: config.clone(),
        db: db.clone(),
        tokens: tokens.clone(),
        auth_service,
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
    };

    let app = build_router(state).await.expect("Failed to build router");

    TestApp {
        app,
        db,
        tokens,
        config,
        db_name,
    }
}

impl TestApp {
    pub async fn teardown(&self) {
        let client = mongodb::Client::with_uri_str(&self.config.mongodb.uri)
            .await
            .expect("Failed to connect for teardown");
        client
            .database(&self.db_name)
            .drop(None)
            .await
            .expect("Failed to drop test database");
    }
}

/// Request builder with the pieces handlers expect from a real connection:
/// a peer address and a user agent.
pub fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::USER_AGENT, TEST_USER_AGENT)
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 5555))))
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    request(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn read_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of the refresh cookie set on the response, if any.
pub fn refresh_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("refresh_token="))
        .and_then(|v| v.split(';').next())
        .and_then(|v| v.strip_prefix("refresh_token="))
        .map(|v| v.to_string())
}

pub fn cookie_header(token: &str) -> String {
    format!("refresh_token={}", token)
}
