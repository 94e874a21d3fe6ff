//! Authenticated profile and address management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_bson, DateTime as BsonDateTime, Document};
use mongodb::options::FindOptions;
use service_core::error::AppError;

use crate::dtos::{CreateAddressRequest, ProfileResponse, UpdateAddressRequest, UpdateProfileRequest};
use crate::middleware::AuthUser;
use crate::models::{Address, SanitizedUser};
use crate::utils::validation::ValidatedJson;
use crate::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let addresses = load_addresses(&state, &user.id).await?;
    Ok(Json(ProfileResponse {
        user: user.sanitized(),
        addresses,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<SanitizedUser>, AppError> {
    let mut changes = doc! { "updated_at": BsonDateTime::now() };
    if let Some(name) = payload.name {
        changes.insert("name", name);
    }
    if let Some(phone) = payload.phone {
        changes.insert("phone", phone);
    }

    state
        .db
        .users()
        .update_one(doc! { "_id": &user.id }, doc! { "$set": changes }, None)
        .await?;

    let updated = state
        .db
        .find_user_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(updated.sanitized()))
}

pub async fn create_address(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<Address>), AppError> {
    let address = Address::new(
        user.id.clone(),
        payload.label,
        payload.line1,
        payload.line2,
        payload.city,
        payload.state,
        payload.postal_code,
        payload.country,
        payload.is_default,
    );

    if address.is_default {
        clear_default_address(&state, &user.id).await?;
    }

    state.db.addresses().insert_one(&address, None).await?;
    state
        .db
        .users()
        .update_one(
            doc! { "_id": &user.id },
            doc! {
                "$push": { "addresses": &address.id },
                "$set": { "updated_at": BsonDateTime::now() },
            },
            None,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(address)))
}

pub async fn update_address(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(address_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateAddressRequest>,
) -> Result<Json<Address>, AppError> {
    if payload.is_default == Some(true) {
        clear_default_address(&state, &user.id).await?;
    }

    let mut changes = doc! { "updated_at": BsonDateTime::now() };
    if let Some(label) = payload.label {
        changes.insert(
            "label",
            to_bson(&label).map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?,
        );
    }
    if let Some(line1) = payload.line1 {
        changes.insert("line1", line1);
    }
    if let Some(line2) = payload.line2 {
        changes.insert("line2", line2);
    }
    if let Some(city) = payload.city {
        changes.insert("city", city);
    }
    if let Some(state_name) = payload.state {
        changes.insert("state", state_name);
    }
    if let Some(postal_code) = payload.postal_code {
        changes.insert("postal_code", postal_code);
    }
    if let Some(country) = payload.country {
        changes.insert("country", country);
    }
    if let Some(is_default) = payload.is_default {
        changes.insert("is_default", is_default);
    }

    // Ownership is part of the filter, so one user can never touch
    // another's address.
    let result = state
        .db
        .addresses()
        .update_one(
            doc! { "_id": &address_id, "user_id": &user.id },
            doc! { "$set": changes },
            None,
        )
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Address not found")));
    }

    let updated = state
        .db
        .addresses()
        .find_one(doc! { "_id": &address_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Address not found")))?;

    Ok(Json(updated))
}

pub async fn delete_address(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(address_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let result = state
        .db
        .addresses()
        .delete_one(doc! { "_id": &address_id, "user_id": &user.id }, None)
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::NotFound(anyhow::anyhow!("Address not found")));
    }

    state
        .db
        .users()
        .update_one(
            doc! { "_id": &user.id },
            doc! {
                "$pull": { "addresses": &address_id },
                "$set": { "updated_at": BsonDateTime::now() },
            },
            None,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn load_addresses(state: &AppState, user_id: &str) -> Result<Vec<Address>, AppError> {
    let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
    Ok(state
        .db
        .addresses()
        .find(doc! { "user_id": user_id }, options)
        .await?
        .try_collect()
        .await?)
}

async fn clear_default_address(state: &AppState, user_id: &str) -> Result<(), AppError> {
    let filter: Document = doc! { "user_id": user_id, "is_default": true };
    state
        .db
        .addresses()
        .update_many(filter, doc! { "$set": { "is_default": false } }, None)
        .await?;
    Ok(())
}
