//! Vitrina Core - Canonical storefront types.
//!
//! This crate provides the types shared by every Vitrina component:
//! - `client` - API gateway, response normalizer, and client-local state
//! - `cli` - Command-line front end for the storefront and admin console
//!
//! # Architecture
//!
//! The core crate contains only types and the client-side state machines
//! (cart contents, sale status transitions, landing section ordering) - no I/O,
//! no HTTP clients, no storage. The remote API stays the source of truth; these
//! types only ever hold transient copies of backend entities.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, prices, and status/role/section enums
//! - [`models`] - Canonical entities (categories, products, sales, landing page, cart)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
