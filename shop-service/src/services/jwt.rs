use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::models::UserRole;

/// Stateless issuer and verifier for the access/refresh token pair.
///
/// Access and refresh tokens are signed with separate HS256 secrets, so
/// forging one class of token gives no leverage over the other. Nothing here
/// touches storage; persistence of refresh sessions is the session store's
/// job.
#[derive(Clone)]
pub struct TokenService {
    access_encoding_key: EncodingKey,
    access_decoding_key: DecodingKey,
    refresh_encoding_key: EncodingKey,
    refresh_decoding_key: DecodingKey,
    access_token_expiry_minutes: i64,
    refresh_token_expiry_days: i64,
}

/// Claims for access tokens (short-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User role, so authorization checks need no user lookup
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Claims for refresh tokens (long-lived)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Random per-issue nonce; two tokens minted in the same second for the
    /// same user must still hash differently
    pub jti: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Result<Self, anyhow::Error> {
        if config.access_secret == config.refresh_secret {
            return Err(anyhow::anyhow!(
                "Access and refresh signing secrets must differ"
            ));
        }

        Ok(Self {
            access_encoding_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        })
    }

    /// Generate an access token for a user
    pub fn generate_access_token(
        &self,
        user_id: &str,
        role: UserRole,
    ) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode access token: {}", e))?;

        Ok(token)
    }

    /// Generate a refresh token for a user
    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let exp = now + Duration::days(self.refresh_token_expiry_days);

        let claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding_key)
            .map_err(|e| anyhow::anyhow!("Failed to encode refresh token: {}", e))?;

        Ok(token)
    }

    /// Validate and decode an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, &self.access_decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Invalid access token: {}", e))?;

        Ok(token_data.claims)
    }

    /// Validate and decode a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims, anyhow::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data =
            decode::<RefreshTokenClaims>(token, &self.refresh_decoding_key, &validation)
                .map_err(|e| anyhow::anyhow!("Invalid refresh token: {}", e))?;

        Ok(token_data.claims)
    }

    pub fn refresh_token_expiry_days(&self) -> i64 {
        self.refresh_token_expiry_days
    }

    /// Get access token expiry in seconds (for client info)
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }
}
