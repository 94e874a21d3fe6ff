use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One wishlist per user, upserted on first add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(rename = "_id")]
    pub id: String,

    pub user_id: String,

    #[serde(default)]
    pub product_ids: Vec<String>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
