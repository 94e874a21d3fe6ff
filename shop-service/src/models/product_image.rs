use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(rename = "_id")]
    pub id: String,

    pub product_id: String,

    pub image_url: String,

    /// Upstream asset id, used when deleting from the image CDN.
    pub public_id: Option<String>,

    #[serde(default)]
    pub alt_text: String,

    #[serde(default)]
    pub order_index: i32,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl ProductImage {
    pub fn new(product_id: String, image_url: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            product_id,
            image_url,
            public_id: None,
            alt_text: String::new(),
            order_index: 0,
            created_at: Utc::now(),
        }
    }
}
