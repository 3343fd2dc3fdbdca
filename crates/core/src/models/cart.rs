//! Shopping cart held on the client until checkout.

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::sale::{SaleRequest, SaleRequestItem};
use crate::types::{Price, ProductId};

/// One cart line: a product snapshot and the requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    /// Snapshot taken when the product was added, used for display and the
    /// local total. The backend prices the sale from its own catalog.
    pub product: Product,
    pub quantity: u32,
}

/// Ordered list of cart lines, at most one line per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased;
    /// otherwise a new line is appended. Adding zero units is a no-op.
    pub fn add(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem {
            product_id: product.id.clone(),
            product,
            quantity,
        });
    }

    /// Set the quantity of a line. A quantity of zero removes the line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|i| &i.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| &i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of snapshot price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(|i| i.product.price.times(i.quantity))
            .sum()
    }

    /// Body for the create-sale call.
    #[must_use]
    pub fn sale_request(&self) -> SaleRequest {
        SaleRequest {
            items: self
                .items
                .iter()
                .map(|i| SaleRequestItem {
                    product_id: i.product_id.clone(),
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from persisted lines, merging duplicates and dropping
    /// zero-quantity lines.
    fn from(lines: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(line.product, line.quantity);
        }
        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::CategoryId;

    fn product(id: &str, cents: i64) -> Product {
        let ts: DateTime<Utc> = "2024-05-01T10:00:00Z".parse().unwrap();
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            description: String::new(),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            image: String::new(),
            category_id: CategoryId::new("c1"),
            stock: None,
            created_at: ts,
            updated_at: ts,
            category: None,
        }
    }

    #[test]
    fn test_add_merges_existing_line() {
        let mut cart = Cart::new();
        cart.add(product("p1", 999), 1);
        cart.add(product("p2", 100), 2);
        cart.add(product("p1", 999), 3);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.unit_count(), 6);
    }

    #[test]
    fn test_total_of_huge_prices_saturates() {
        let mut huge = product("p1", 0);
        huge.price = Price::new(Decimal::from_i128_with_scale(10_i128.pow(28), 0)).unwrap();
        let mut cart = Cart::new();
        cart.add(huge, 10);
        cart.add(product("p2", 100), 1);
        assert_eq!(cart.total().amount(), Decimal::MAX);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("p1", 999), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(product("p1", 999), 2);
        assert!(cart.set_quantity(&ProductId::new("p1"), 5));
        assert_eq!(cart.items()[0].quantity, 5);
        assert!(cart.set_quantity(&ProductId::new("p1"), 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity(&ProductId::new("missing"), 1));
    }

    #[test]
    fn test_total_is_exact() {
        let mut cart = Cart::new();
        cart.add(product("p1", 10), 3);
        cart.add(product("p2", 20), 1);
        assert_eq!(cart.total(), Price::new(Decimal::new(50, 2)).unwrap());
        assert_eq!(cart.total().display(), "$0.50");
    }

    #[test]
    fn test_sale_request_preserves_order() {
        let mut cart = Cart::new();
        cart.add(product("p2", 100), 1);
        cart.add(product("p1", 100), 2);
        let request = cart.sale_request();
        let ids: Vec<_> = request.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[test]
    fn test_from_lines_merges_duplicates() {
        let lines = vec![
            CartItem {
                product_id: ProductId::new("p1"),
                product: product("p1", 100),
                quantity: 1,
            },
            CartItem {
                product_id: ProductId::new("p1"),
                product: product("p1", 100),
                quantity: 2,
            },
            CartItem {
                product_id: ProductId::new("p2"),
                product: product("p2", 100),
                quantity: 0,
            },
        ];
        let cart = Cart::from(lines);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }
}
