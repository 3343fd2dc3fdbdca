//! Persisted cart and checkout.
//!
//! The cart is stored under the `cart` key as a versioned envelope:
//!
//! ```json
//! {"version": 1, "items": [{"productId": "p1", "product": {...}, "quantity": 2}]}
//! ```
//!
//! A bare array of lines (the unversioned layout) is still accepted on load.
//! Anything else loads as an empty cart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use vitrina_core::{Cart, CartItem, Sale};

use crate::api::{ApiClient, GatewayError, Outcome, Rejection};
use crate::store::{ClientStore, StoreError};

/// Store key holding the cart.
pub const CART_KEY: &str = "cart";

/// Current cart envelope version.
pub const CART_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    items: &'a [CartItem],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    #[serde(default)]
    items: Vec<CartItem>,
}

/// Loads and saves the cart through the client store.
#[derive(Debug, Clone)]
pub struct CartStore {
    store: Arc<dyn ClientStore>,
}

impl CartStore {
    #[must_use]
    pub const fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }

    /// The persisted cart. Missing, corrupt, or wrong-version data yields an
    /// empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        self.store
            .get(CART_KEY)
            .map_or_else(Cart::new, |raw| decode(&raw))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the cart could not be written.
    pub fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(&EnvelopeRef {
            version: CART_VERSION,
            items: cart.items(),
        })?;
        self.store.set(CART_KEY, &encoded)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if the cart could not be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CART_KEY)
    }

    /// Load, modify, and save the cart in one step.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the modified cart could not be written.
    pub fn update<R>(&self, f: impl FnOnce(&mut Cart) -> R) -> Result<(Cart, R), StoreError> {
        let mut cart = self.load();
        let result = f(&mut cart);
        self.save(&cart)?;
        Ok((cart, result))
    }
}

fn decode(raw: &str) -> Cart {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Stored cart is not valid JSON, starting empty");
            return Cart::new();
        }
    };

    let lines = if value.is_array() {
        serde_json::from_value::<Vec<CartItem>>(value)
    } else {
        match serde_json::from_value::<Envelope>(value) {
            Ok(envelope) if envelope.version == CART_VERSION => Ok(envelope.items),
            Ok(envelope) => {
                warn!(
                    version = envelope.version,
                    expected = CART_VERSION,
                    "Stored cart version mismatch, starting empty"
                );
                return Cart::new();
            }
            Err(e) => Err(e),
        }
    };

    lines.map(Cart::from).unwrap_or_else(|e| {
        warn!(error = %e, "Stored cart is malformed, starting empty");
        Cart::new()
    })
}

/// Result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    /// The sale was created and the cart cleared.
    Placed(Sale),
    /// Nothing to buy; no request was made.
    EmptyCart,
    /// No token is held; no request was made.
    LoginRequired,
    /// The backend refused the sale; the cart is kept.
    Rejected(Rejection),
}

impl ApiClient {
    /// The persisted cart, sharing this client's store.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::new(Arc::clone(self.session().store()))
    }

    /// Turn the persisted cart into a sale.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails, or
    /// the emptied cart cannot be persisted. The cart is kept on error.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Checkout, GatewayError> {
        if !self.is_authenticated() {
            return Ok(Checkout::LoginRequired);
        }

        let carts = self.cart();
        let cart = carts.load();
        if cart.is_empty() {
            return Ok(Checkout::EmptyCart);
        }

        match self.create_sale(&cart.sale_request()).await? {
            Outcome::Ok(sale) => {
                carts.clear()?;
                info!(sale_id = %sale.id, total = %sale.total, "Checkout complete");
                Ok(Checkout::Placed(sale))
            }
            Outcome::Rejected(rejection) => Ok(Checkout::Rejected(rejection)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use vitrina_core::{CategoryId, Price, Product, ProductId};

    use super::*;
    use crate::store::MemoryStore;

    fn product(id: &str) -> Product {
        let ts: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        Product {
            id: ProductId::new(id),
            name: id.to_string(),
            description: String::new(),
            price: Price::new(Decimal::new(250, 2)).unwrap(),
            image: String::new(),
            category_id: CategoryId::new("c1"),
            stock: Some(4),
            created_at: ts,
            updated_at: ts,
            category: None,
        }
    }

    fn carts() -> (CartStore, Arc<dyn ClientStore>) {
        let store: Arc<dyn ClientStore> = Arc::new(MemoryStore::new());
        (CartStore::new(Arc::clone(&store)), store)
    }

    #[test]
    fn test_save_and_load() {
        let (carts, store) = carts();
        let (cart, ()) = carts
            .update(|cart| {
                cart.add(product("p1"), 2);
                cart.add(product("p1"), 1);
            })
            .unwrap();
        assert_eq!(cart.unit_count(), 3);

        let raw: Value = serde_json::from_str(&store.get(CART_KEY).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["items"][0]["productId"], "p1");
        assert_eq!(raw["items"][0]["quantity"], 3);

        assert_eq!(carts.load(), cart);
    }

    #[test]
    fn test_legacy_array_accepted() {
        let (carts, store) = carts();
        let lines = serde_json::to_string(&[CartItem {
            product_id: ProductId::new("p1"),
            product: product("p1"),
            quantity: 2,
        }])
        .unwrap();
        store.set(CART_KEY, &lines).unwrap();
        assert_eq!(carts.load().unit_count(), 2);
    }

    #[test]
    fn test_bad_data_loads_empty() {
        let (carts, store) = carts();
        for raw in ["not json", r#"{"version": 9, "items": []}"#, r#"{"items": 3}"#, "42"] {
            store.set(CART_KEY, raw).unwrap();
            assert!(carts.load().is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_clear() {
        let (carts, store) = carts();
        carts.update(|cart| cart.add(product("p1"), 1)).unwrap();
        carts.clear().unwrap();
        assert_eq!(store.get(CART_KEY), None);
        assert!(carts.load().is_empty());
    }
}
