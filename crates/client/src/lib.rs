//! Vitrina storefront client.
//!
//! Talks to the storefront backend over REST and hands back canonical
//! entities from `vitrina-core`, whatever key casing the backend used.
//!
//! # Architecture
//!
//! - [`normalize`] turns raw JSON payloads into canonical entities
//! - [`ApiClient`] sends requests and classifies every response as success,
//!   rejection, backend unavailable, or server failure
//! - [`Diagnostics`] receives server failures exactly once
//! - [`ClientStore`] persists the token, role marker, and cart between runs
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_client::{ApiClient, ClientConfig, Outcome};
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::from_config(&config)?;
//!
//! match api.list_products(None).await {
//!     Ok(Outcome::Ok(products)) => println!("{} products", products.len()),
//!     Ok(Outcome::Rejected(rejection)) => eprintln!("{}", rejection.message),
//!     Err(e) if e.is_unavailable() => eprintln!("backend not available"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod diagnostics;
pub mod normalize;
pub mod session;
pub mod store;

pub use api::{
    ApiClient, ApiClientBuilder, Catalog, GatewayError, Outcome, RegisterInput, Rejection,
    UnavailableReason, WorkflowError,
};
pub use cart::{CartStore, Checkout};
pub use config::{ClientConfig, ConfigError};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use normalize::{Normalize, NormalizeError};
pub use session::Session;
pub use store::{ClientStore, FileStore, MemoryStore, StoreError};
