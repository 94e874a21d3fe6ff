use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::SanitizedUser;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 120, message = "Name must not be empty"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 20, message = "Phone number too long"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Body returned by register, login and refresh. The refresh token itself
/// travels only in the http-only cookie, never in the body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: SanitizedUser,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}
