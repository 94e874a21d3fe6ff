//! Refresh sessions: one document per issued refresh credential.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a session was opened from. Login uses this to clear stale sessions
/// for the same device; rotation stamps the replacement session with the
/// device presenting the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub user_agent: String,
    pub ip: String,
}

/// Server-side record backing one refresh credential. Only the one-way hash
/// of the token is ever stored; matching a presented token means re-running
/// the hash verification against each candidate record for the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    /// Argon2 hash of the refresh token plaintext. Never the plaintext.
    pub token_hash: String,

    pub user_agent: String,

    pub ip: String,

    /// Past this instant the record must behave as absent, whether or not
    /// the TTL monitor has physically removed it yet.
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub expires_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: String, token_hash: String, device: &DeviceDescriptor, ttl_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token_hash,
            user_agent: device.user_agent.clone(),
            ip: device.ip.clone(),
            expires_at: now + Duration::days(ttl_days),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> DeviceDescriptor {
        DeviceDescriptor {
            user_agent: "integration-test/1.0".to_string(),
            ip: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn new_session_is_unexpired_and_carries_device() {
        let session = Session::new("user_1".to_string(), "hash".to_string(), &device(), 30);
        assert!(!session.is_expired());
        assert_eq!(session.user_agent, "integration-test/1.0");
        assert_eq!(session.ip, "127.0.0.1");
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn elapsed_expiry_marks_session_expired() {
        let mut session = Session::new("user_1".to_string(), "hash".to_string(), &device(), 30);
        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }

    #[test]
    fn stored_fields_never_include_plaintext() {
        let session = Session::new("user_1".to_string(), "hash".to_string(), &device(), 30);
        let doc = mongodb::bson::to_document(&session).unwrap();
        let keys: Vec<_> = doc.keys().collect();
        assert_eq!(
            keys,
            vec![
                "_id",
                "user_id",
                "token_hash",
                "user_agent",
                "ip",
                "expires_at",
                "created_at"
            ]
        );
    }
}
