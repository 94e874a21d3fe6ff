//! Account and session lifecycle: register, login, refresh rotation, logout.

use service_core::error::AppError;

use crate::models::{DeviceDescriptor, Session, User};
use crate::services::database::MongoDb;
use crate::services::error::ServiceError;
use crate::services::jwt::TokenService;
use crate::utils::password::{hash_secret, verify_secret, Secret, SecretHash};

/// Freshly minted token pair. The refresh token exists in plaintext only in
/// this value, on its way to the response cookie.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    db: MongoDb,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(db: MongoDb, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Create an account and open its first session.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        phone: Option<String>,
        device: &DeviceDescriptor,
    ) -> Result<(User, IssuedTokens), AppError> {
        if self.db.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::EmailAlreadyRegistered.into());
        }

        let password_hash = hash_secret(&Secret::new(password))?;
        let user = User::new(name, email, password_hash.into_string(), phone);
        // The unique email index backstops the pre-check under concurrent
        // registrations
        if let Err(e) = self.db.users().insert_one(&user, None).await {
            if is_duplicate_key(&e) {
                return Err(ServiceError::EmailAlreadyRegistered.into());
            }
            return Err(e.into());
        }

        tracing::info!(user_id = %user.id, "User registered");

        let tokens = self.open_session(&user, device).await?;
        Ok((user, tokens))
    }

    /// Verify credentials and open a session, replacing any earlier sessions
    /// from the same device.
    pub async fn login(
        &self,
        email: String,
        password: String,
        device: &DeviceDescriptor,
    ) -> Result<(User, IssuedTokens), AppError> {
        // Unknown email and wrong password are indistinguishable to the
        // caller.
        let user = self
            .db
            .find_user_by_email(&email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let password_matches = verify_secret(
            &Secret::new(password),
            &SecretHash::new(user.password_hash.clone()),
        )?;
        if !password_matches {
            return Err(ServiceError::InvalidCredentials.into());
        }

        let removed = self
            .db
            .delete_sessions_for_device(&user.id, &device.user_agent)
            .await?;
        if removed > 0 {
            tracing::debug!(user_id = %user.id, removed, "Replaced prior sessions for device");
        }

        let tokens = self.open_session(&user, device).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((user, tokens))
    }

    /// Rotate a presented refresh token: match it against the user's stored
    /// sessions, retire the matched session, and issue a replacement pair.
    ///
    /// The matched session is deleted before anything new is issued, and the
    /// delete is conditional on the record still being present. Two
    /// concurrent presentations of the same token race on that delete; the
    /// loser sees the record gone and fails, so a refresh token is usable
    /// exactly once.
    pub async fn rotate(
        &self,
        presented: Option<String>,
        device: &DeviceDescriptor,
    ) -> Result<(User, IssuedTokens), AppError> {
        let presented = match presented {
            Some(token) if !token.is_empty() => token,
            _ => return Err(ServiceError::MissingCredential.into()),
        };

        let claims = self
            .tokens
            .validate_refresh_token(&presented)
            .map_err(|_| ServiceError::InvalidCredential)?;

        let sessions = self.db.find_sessions_for_user(&claims.sub).await?;
        if sessions.is_empty() {
            return Err(ServiceError::NoActiveSession.into());
        }

        // Hashes are salted, so there is no way to look the token up
        // directly; every live candidate has to be re-verified.
        let secret = Secret::new(presented);
        let mut matched: Option<Session> = None;
        for session in sessions {
            if session.is_expired() {
                continue;
            }
            if verify_secret(&secret, &SecretHash::new(session.token_hash.clone()))? {
                matched = Some(session);
                break;
            }
        }
        let matched = matched.ok_or(ServiceError::CredentialNotRecognized)?;

        // One-time use: whoever deletes the record wins the rotation. A lost
        // race means this token was already spent.
        if !self.db.delete_session(&matched.id).await? {
            tracing::warn!(
                user_id = %claims.sub,
                session_id = %matched.id,
                "Refresh token replayed; session already consumed"
            );
            return Err(ServiceError::CredentialNotRecognized.into());
        }

        // The account can disappear while sessions for it still exist; the
        // token is consumed either way.
        let user = self
            .db
            .find_user_by_id(&claims.sub)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        let tokens = self.open_session(&user, device).await?;
        tracing::debug!(user_id = %user.id, "Refresh token rotated");
        Ok((user, tokens))
    }

    /// Revoke every session for the user identified by the presented refresh
    /// token. Never fails toward the caller: an absent, garbled, or expired
    /// token simply means there is nothing to revoke.
    pub async fn logout(&self, presented: Option<String>) {
        let Some(token) = presented.filter(|t| !t.is_empty()) else {
            return;
        };
        let Ok(claims) = self.tokens.validate_refresh_token(&token) else {
            return;
        };

        match self.db.delete_sessions_for_user(&claims.sub).await {
            Ok(removed) => {
                tracing::info!(user_id = %claims.sub, removed, "User logged out");
            }
            Err(e) => {
                // Logout stays 200 even if revocation failed; the sessions
                // will still age out through their expiry.
                tracing::error!(user_id = %claims.sub, "Failed to revoke sessions on logout: {}", e);
            }
        }
    }

    /// Issue a token pair and persist the session record backing the refresh
    /// half. Only the Argon2 hash of the refresh token is stored.
    async fn open_session(
        &self,
        user: &User,
        device: &DeviceDescriptor,
    ) -> Result<IssuedTokens, AppError> {
        let access_token = self.tokens.generate_access_token(&user.id, user.role)?;
        let refresh_token = self.tokens.generate_refresh_token(&user.id)?;

        let token_hash = hash_secret(&Secret::new(refresh_token.clone()))?;
        let session = Session::new(
            user.id.clone(),
            token_hash.into_string(),
            device,
            self.tokens.refresh_token_expiry_days(),
        );
        self.db.insert_session(&session).await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
        })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_err)) if write_err.code == 11000
    )
}
