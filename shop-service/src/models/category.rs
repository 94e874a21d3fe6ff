use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub slug: String,

    /// None for top-level categories.
    pub parent_id: Option<String>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug: slug.to_lowercase(),
            parent_id,
            created_at: Utc::now(),
        }
    }
}
