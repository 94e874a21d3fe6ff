//! Public catalog endpoints: listing, search, category browsing, detail.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document, Regex};
use mongodb::options::FindOptions;
use service_core::error::AppError;

use crate::dtos::{
    CategoryProductsResponse, ListProductsParams, ProductDetailResponse, ProductListResponse,
    SearchParams, SearchResponse,
};
use crate::models::Product;
use crate::AppState;

const DEFAULT_PAGE_SIZE: u64 = 12;
const MAX_PAGE_SIZE: u64 = 100;
const SEARCH_RESULT_LIMIT: i64 = 20;
const CATEGORY_RESULT_LIMIT: i64 = 20;
const RELATED_RESULT_LIMIT: i64 = 4;

/// Filtered, sorted, paginated listing over active products.
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListProductsParams>,
) -> Result<Json<ProductListResponse>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let mut filter = doc! { "is_active": true };

    if let Some(slug) = params.category.as_deref().filter(|s| !s.is_empty()) {
        match state
            .db
            .categories()
            .find_one(doc! { "slug": slug.to_lowercase() }, None)
            .await?
        {
            Some(category) => {
                filter.insert("category_id", category.id);
            }
            // Unknown category slug is an empty page, not an error.
            None => {
                return Ok(Json(ProductListResponse {
                    products: Vec::new(),
                    page,
                    limit,
                    total: 0,
                    total_pages: 0,
                }));
            }
        }
    }

    let mut price = Document::new();
    if let Some(min) = params.price_min {
        price.insert("$gte", min);
    }
    if let Some(max) = params.price_max {
        price.insert("$lte", max);
    }
    if !price.is_empty() {
        filter.insert("price", price);
    }

    if let Some(material) = params.material.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("meta.material", material);
    }
    if let Some(artisan) = params.artisan.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("meta.artisan", artisan);
    }
    if let Some(tags) = params.tags.as_deref() {
        let tags: Vec<String> = tags
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            filter.insert("tags", doc! { "$in": tags });
        }
    }

    let sort = match params.sort.as_deref() {
        Some("price_asc") => doc! { "price": 1 },
        Some("price_desc") => doc! { "price": -1 },
        _ => doc! { "created_at": -1 },
    };

    let total = state.db.products().count_documents(filter.clone(), None).await?;

    let options = FindOptions::builder()
        .sort(sort)
        .skip((page - 1) * limit)
        .limit(limit as i64)
        .build();
    let products = collect_products(&state, filter, options).await?;

    Ok(Json(ProductListResponse {
        products,
        page,
        limit,
        total,
        total_pages: total.div_ceil(limit),
    }))
}

/// Keyword search across name, description, tags, material and artisan.
/// Terms are matched independently: any term hitting any field qualifies.
pub async fn search_products(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.query.as_deref().unwrap_or("").trim().to_lowercase();
    if query.is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Query parameter is required"
        )));
    }

    // Naive singularization so "necklaces" still finds "necklace"
    let base_query = query.strip_suffix('s').unwrap_or(&query);

    let patterns: Vec<Bson> = base_query
        .split_whitespace()
        .map(|term| {
            Bson::RegularExpression(Regex {
                pattern: escape_regex(term),
                options: "i".to_string(),
            })
        })
        .collect();

    if patterns.is_empty() {
        return Ok(Json(SearchResponse {
            query,
            count: 0,
            products: Vec::new(),
        }));
    }

    let filter = doc! {
        "is_active": true,
        "$or": [
            { "name": { "$in": patterns.clone() } },
            { "description": { "$in": patterns.clone() } },
            { "tags": { "$in": patterns.clone() } },
            { "meta.material": { "$in": patterns.clone() } },
            { "meta.artisan": { "$in": patterns } },
        ],
    };

    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(SEARCH_RESULT_LIMIT)
        .build();
    let products = collect_products(&state, filter, options).await?;

    Ok(Json(SearchResponse {
        query,
        count: products.len(),
        products,
    }))
}

/// Active products in the category with the given slug.
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryProductsResponse>, AppError> {
    let category = state
        .db
        .categories()
        .find_one(doc! { "slug": slug.to_lowercase() }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Category not found")))?;

    let options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(CATEGORY_RESULT_LIMIT)
        .build();
    let products = collect_products(
        &state,
        doc! { "category_id": category.id, "is_active": true },
        options,
    )
    .await?;

    Ok(Json(CategoryProductsResponse {
        category: category.name,
        products,
    }))
}

/// Product detail by slug, with its image gallery and a few related items
/// from the same category.
pub async fn product_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetailResponse>, AppError> {
    let product = state
        .db
        .products()
        .find_one(doc! { "slug": slug.to_lowercase(), "is_active": true }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product not found")))?;

    let image_options = FindOptions::builder().sort(doc! { "order_index": 1 }).build();
    let images = state
        .db
        .product_images()
        .find(doc! { "product_id": &product.id }, image_options)
        .await?
        .try_collect()
        .await?;

    let related_options = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .limit(RELATED_RESULT_LIMIT)
        .build();
    let related = collect_products(
        &state,
        doc! {
            "category_id": &product.category_id,
            "_id": { "$ne": &product.id },
            "is_active": true,
        },
        related_options,
    )
    .await?;

    Ok(Json(ProductDetailResponse {
        product,
        images,
        related,
    }))
}

async fn collect_products(
    state: &AppState,
    filter: Document,
    options: FindOptions,
) -> Result<Vec<Product>, AppError> {
    Ok(state
        .db
        .products()
        .find(filter, options)
        .await?
        .try_collect()
        .await?)
}

/// Search terms are user input; treat them as literals, not patterns.
fn escape_regex(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_metacharacters_are_escaped() {
        assert_eq!(escape_regex("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_regex("plain"), "plain");
        assert_eq!(escape_regex("(x)"), "\\(x\\)");
    }
}
