//! Canonical storefront entities.
//!
//! These are the shapes the client's response normalizer produces, whatever
//! casing the backend used on the wire. They serialize as camelCase JSON.

pub mod cart;
pub mod catalog;
pub mod landing;
pub mod sale;
pub mod user;

pub use cart::{Cart, CartItem};
pub use catalog::{Category, CategoryInput, Product, ProductInput, group_by_category};
pub use landing::{LandingPageData, LandingSection, LandingSectionPatch};
pub use sale::{Sale, SaleItem, SaleRequest, SaleRequestItem};
pub use user::User;
