use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLabel {
    #[default]
    Home,
    Work,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    #[serde(default)]
    pub label: AddressLabel,

    pub line1: String,

    pub line2: Option<String>,

    pub city: String,

    pub state: String,

    pub postal_code: String,

    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default)]
    pub is_default: bool,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

fn default_country() -> String {
    "India".to_string()
}

impl Address {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        label: AddressLabel,
        line1: String,
        line2: Option<String>,
        city: String,
        state: String,
        postal_code: String,
        country: Option<String>,
        is_default: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            label,
            line1,
            line2,
            city,
            state,
            postal_code,
            country: country.unwrap_or_else(default_country),
            is_default,
            created_at: now,
            updated_at: now,
        }
    }
}
