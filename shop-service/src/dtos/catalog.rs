use serde::{Deserialize, Serialize};

use crate::models::{Category, Product, ProductImage};

/// Query parameters for the filtered product listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// One of `price_asc`, `price_desc`, `newest` (default).
    pub sort: Option<String>,
    /// Category slug, resolved to its id before filtering.
    pub category: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub material: Option<String>,
    pub artisan: Option<String>,
    /// Comma-separated list, any-of semantics.
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoryProductsResponse {
    pub category: String,
    pub products: Vec<Product>,
}

/// Product detail page payload: the product, its gallery, and a handful of
/// related items from the same category.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: Product,
    pub images: Vec<ProductImage>,
    pub related: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// One node of the category tree.
#[derive(Debug, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}
