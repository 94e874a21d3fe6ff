pub mod address;
pub mod category;
pub mod product;
pub mod product_image;
pub mod session;
pub mod user;
pub mod wishlist;

pub use address::{Address, AddressLabel};
pub use category::Category;
pub use product::{Product, ProductMeta};
pub use product_image::ProductImage;
pub use session::{DeviceDescriptor, Session};
pub use user::{SanitizedUser, User, UserRole};
pub use wishlist::Wishlist;
