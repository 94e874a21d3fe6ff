pub mod auth;
pub mod database;
pub mod error;
pub mod jwt;

pub use auth::{AuthService, IssuedTokens};
pub use database::MongoDb;
pub use error::ServiceError;
pub use jwt::{AccessTokenClaims, RefreshTokenClaims, TokenService};
