//! Catalog product documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductMeta {
    pub material: Option<String>,
    pub artisan: Option<String>,
    pub weight: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Unique, lowercased; the public identifier in catalog URLs.
    pub slug: String,

    pub description: String,

    pub sku: String,

    pub price: f64,

    #[serde(default = "default_currency")]
    pub currency: String,

    pub category_id: String,

    /// References into the product_images collection.
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub meta: ProductMeta,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Inactive products are invisible to every catalog endpoint.
    #[serde(default = "default_is_active")]
    pub is_active: bool,

    #[serde(default)]
    pub stock: i32,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_is_active() -> bool {
    true
}

impl Product {
    pub fn new(
        name: String,
        slug: String,
        description: String,
        sku: String,
        price: f64,
        category_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug: slug.to_lowercase(),
            description,
            sku,
            price,
            currency: default_currency(),
            category_id,
            images: Vec::new(),
            meta: ProductMeta::default(),
            tags: Vec::new(),
            is_active: true,
            stock: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
