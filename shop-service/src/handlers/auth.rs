//! Account endpoints: register, login, refresh, logout.
//!
//! The refresh token rides exclusively in an http-only cookie; response
//! bodies only ever carry the access token.

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service_core::error::AppError;
use std::net::SocketAddr;

use crate::dtos::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};
use crate::models::DeviceDescriptor;
use crate::utils::validation::ValidatedJson;
use crate::AppState;

pub const REFRESH_COOKIE: &str = "refresh_token";

pub async fn register(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let device = device_from_request(&headers, addr);

    let (user, tokens) = state
        .auth_service
        .register(
            payload.name,
            payload.email,
            payload.password,
            payload.phone,
            &device,
        )
        .await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    let body = AuthResponse {
        access_token: tokens.access_token,
        expires_in: state.tokens.access_token_expiry_seconds(),
        user: user.sanitized(),
    };

    Ok((jar, (StatusCode::CREATED, Json(body))))
}

pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let device = device_from_request(&headers, addr);

    let (user, tokens) = state
        .auth_service
        .login(payload.email, payload.password, &device)
        .await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    let body = AuthResponse {
        access_token: tokens.access_token,
        expires_in: state.tokens.access_token_expiry_seconds(),
        user: user.sanitized(),
    };

    Ok((jar, Json(body)))
}

pub async fn refresh(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let device = device_from_request(&headers, addr);
    let presented = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let (user, tokens) = state.auth_service.rotate(presented, &device).await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    let body = AuthResponse {
        access_token: tokens.access_token,
        expires_in: state.tokens.access_token_expiry_seconds(),
        user: user.sanitized(),
    };

    Ok((jar, Json(body)))
}

/// Always 200: logging out with no (or a dead) session is still logged out.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let presented = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    state.auth_service.logout(presented).await;

    let jar = jar.remove(Cookie::build((REFRESH_COOKIE, "")).path("/"));
    Ok((
        jar,
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    ))
}

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.is_prod())
        .max_age(time::Duration::days(
            state.tokens.refresh_token_expiry_days(),
        ))
        .build()
}

/// Device identity for the session record: user agent plus best-guess client
/// IP (proxy header first, socket peer as fallback).
pub fn device_from_request(headers: &HeaderMap, addr: SocketAddr) -> DeviceDescriptor {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string());

    DeviceDescriptor { user_agent, ip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn addr() -> SocketAddr {
        "10.0.0.9:4321".parse().unwrap()
    }

    #[test]
    fn device_prefers_forwarded_header_over_socket() {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("test-agent"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );

        let device = device_from_request(&headers, addr());
        assert_eq!(device.user_agent, "test-agent");
        assert_eq!(device.ip, "203.0.113.7");
    }

    #[test]
    fn device_falls_back_to_socket_and_unknown_agent() {
        let device = device_from_request(&HeaderMap::new(), addr());
        assert_eq!(device.user_agent, "unknown");
        assert_eq!(device.ip, "10.0.0.9");
    }
}
