//! One-way hashing capability used for passwords and refresh-token hashes.
//!
//! Both kinds of secret go through the same salted, costed algorithm, so the
//! protocol code never depends on which algorithm is in use.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Newtype for a plaintext secret to prevent accidental logging
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Newtype for a stored one-way hash
#[derive(Debug, Clone)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Hash a secret using Argon2id with a random salt.
pub fn hash_secret(secret: &Secret) -> Result<SecretHash, anyhow::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let hash = argon2
        .hash_password(secret.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash secret: {}", e))?
        .to_string();

    Ok(SecretHash::new(hash))
}

/// Verify a secret against a stored hash.
///
/// Returns Ok(true) on a match, Ok(false) on a mismatch, Err only when the
/// stored hash is not parseable.
pub fn verify_secret(secret: &Secret, hash: &SecretHash) -> Result<bool, anyhow::Error> {
    let parsed = PasswordHash::new(hash.as_str())
        .map_err(|e| anyhow::anyhow!("Invalid secret hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(secret.as_str().as_bytes(), &parsed)
        .is_ok())
}
