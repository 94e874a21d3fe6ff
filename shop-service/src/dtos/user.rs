use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Address, AddressLabel, SanitizedUser};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120, message = "Name must not be empty"))]
    pub name: Option<String>,

    #[validate(length(max = 20, message = "Phone number too long"))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: SanitizedUser,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[serde(default)]
    pub label: AddressLabel,

    #[validate(length(min = 1, message = "Address line must not be empty"))]
    pub line1: String,

    pub line2: Option<String>,

    #[validate(length(min = 1, message = "City must not be empty"))]
    pub city: String,

    #[validate(length(min = 1, message = "State must not be empty"))]
    pub state: String,

    #[validate(length(min = 1, max = 12, message = "Invalid postal code"))]
    pub postal_code: String,

    pub country: Option<String>,

    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    pub label: Option<AddressLabel>,

    #[validate(length(min = 1, message = "Address line must not be empty"))]
    pub line1: Option<String>,

    pub line2: Option<String>,

    #[validate(length(min = 1, message = "City must not be empty"))]
    pub city: Option<String>,

    #[validate(length(min = 1, message = "State must not be empty"))]
    pub state: Option<String>,

    #[validate(length(min = 1, max = 12, message = "Invalid postal code"))]
    pub postal_code: Option<String>,

    pub country: Option<String>,

    pub is_default: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct WishlistItemRequest {
    #[serde(rename = "productId")]
    #[validate(length(min = 1, message = "Product id must not be empty"))]
    pub product_id: String,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub product_ids: Vec<String>,
}
