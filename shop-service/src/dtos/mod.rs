pub mod auth;
pub mod catalog;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};
pub use catalog::{
    CategoryListResponse, CategoryNode, CategoryProductsResponse, ListProductsParams,
    ProductDetailResponse, ProductListResponse, SearchParams, SearchResponse,
};
pub use user::{
    CreateAddressRequest, ProfileResponse, UpdateAddressRequest, UpdateProfileRequest,
    WishlistItemRequest, WishlistResponse,
};
