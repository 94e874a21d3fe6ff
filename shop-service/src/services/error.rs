use service_core::error::AppError;
use thiserror::Error;

/// Auth failures with a precise cause. Several map to the same 401 so the
/// distinction exists for logs and tests, not for clients.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Refresh token missing")]
    MissingCredential,

    #[error("Invalid refresh token")]
    InvalidCredential,

    #[error("Refresh token not found")]
    NoActiveSession,

    #[error("Refresh token not recognized")]
    CredentialNotRecognized,

    #[error("User not found")]
    UserNotFound,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials
            | ServiceError::MissingCredential
            | ServiceError::InvalidCredential
            | ServiceError::NoActiveSession
            | ServiceError::CredentialNotRecognized => {
                AppError::AuthError(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!(err.to_string()))
            }
            ServiceError::UserNotFound => AppError::NotFound(anyhow::anyhow!(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn rotation_failures_are_unauthorized() {
        for err in [
            ServiceError::MissingCredential,
            ServiceError::InvalidCredential,
            ServiceError::NoActiveSession,
            ServiceError::CredentialNotRecognized,
            ServiceError::InvalidCredentials,
        ] {
            assert_eq!(status_of(err), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn conflict_and_missing_user_map_distinctly() {
        assert_eq!(
            status_of(ServiceError::EmailAlreadyRegistered),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ServiceError::UserNotFound), StatusCode::NOT_FOUND);
    }
}
