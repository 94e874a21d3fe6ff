use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::options::UpdateOptions;
use service_core::error::AppError;
use uuid::Uuid;

use crate::dtos::{WishlistItemRequest, WishlistResponse};
use crate::middleware::AuthUser;
use crate::utils::validation::ValidatedJson;
use crate::AppState;

pub async fn get_wishlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<WishlistResponse>, AppError> {
    let product_ids = state
        .db
        .wishlists()
        .find_one(doc! { "user_id": &user.id }, None)
        .await?
        .map(|w| w.product_ids)
        .unwrap_or_default();

    Ok(Json(WishlistResponse { product_ids }))
}

/// Idempotent add: the wishlist document is upserted on first use and the
/// product id is added at most once.
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<WishlistItemRequest>,
) -> Result<Json<WishlistResponse>, AppError> {
    let product = state
        .db
        .products()
        .find_one(
            doc! { "_id": &payload.product_id, "is_active": true },
            None,
        )
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound(anyhow::anyhow!("Product not found")));
    }

    let options = UpdateOptions::builder().upsert(true).build();
    state
        .db
        .wishlists()
        .update_one(
            doc! { "user_id": &user.id },
            doc! {
                "$addToSet": { "product_ids": &payload.product_id },
                "$set": { "updated_at": BsonDateTime::now() },
                "$setOnInsert": { "_id": Uuid::new_v4().to_string() },
            },
            options,
        )
        .await?;

    current_wishlist(&state, &user.id).await
}

/// Removing an id that is not on the list is a no-op, not an error.
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistResponse>, AppError> {
    state
        .db
        .wishlists()
        .update_one(
            doc! { "user_id": &user.id },
            doc! {
                "$pull": { "product_ids": &product_id },
                "$set": { "updated_at": BsonDateTime::now() },
            },
            None,
        )
        .await?;

    current_wishlist(&state, &user.id).await
}

async fn current_wishlist(
    state: &AppState,
    user_id: &str,
) -> Result<Json<WishlistResponse>, AppError> {
    let product_ids = state
        .db
        .wishlists()
        .find_one(doc! { "user_id": user_id }, None)
        .await?
        .map(|w| w.product_ids)
        .unwrap_or_default();

    Ok(Json(WishlistResponse { product_ids }))
}
