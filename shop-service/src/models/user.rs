//! User account documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

/// User account. The password hash lives only in this document and is never
/// serialized outward; API responses go through [`SanitizedUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,

    /// Stored lowercased; uniqueness is enforced case-insensitively.
    pub email: String,

    pub password_hash: String,

    pub name: String,

    pub phone: Option<String>,

    pub role: UserRole,

    /// References into the addresses collection.
    #[serde(default)]
    pub addresses: Vec<String>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, phone: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            password_hash,
            name,
            phone,
            role: UserRole::Customer,
            addresses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sanitized(&self) -> SanitizedUser {
        SanitizedUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
        }
    }
}

/// User shape returned by the API (no sensitive fields).
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_on_creation() {
        let user = User::new(
            "Asha".to_string(),
            "Asha@Example.COM".to_string(),
            "$argon2id$hash".to_string(),
            None,
        );
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.role, UserRole::Customer);
    }

    #[test]
    fn sanitized_user_has_no_password_hash() {
        let user = User::new(
            "Asha".to_string(),
            "asha@example.com".to_string(),
            "$argon2id$hash".to_string(),
            Some("555-0100".to_string()),
        );
        let json = serde_json::to_value(user.sanitized()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "asha@example.com");
    }
}
