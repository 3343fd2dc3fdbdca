//! Sales (orders) and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::user::User;
use crate::types::{Price, ProductId, SaleId, SaleItemId, SaleStatus, UserId};

/// A sale placed by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub user_id: UserId,
    pub status: SaleStatus,
    /// Total computed by the backend. Never recomputed client-side.
    pub total: Price,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Snapshot of the buyer, when the backend embeds it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// One line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: SaleItemId,
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: u32,
    /// Unit price at the time of sale, decoupled from the current product price.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

impl SaleItem {
    /// Price of this line at the recorded unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl Sale {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Case-insensitive search used by the admin sales listing.
    ///
    /// Matches the buyer's name or email, the sale id, the status label, or
    /// the total amount.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let (name, email) = self
            .user
            .as_ref()
            .map(|u| (u.name.to_lowercase(), u.email.to_lowercase()))
            .unwrap_or_default();

        name.contains(&needle)
            || email.contains(&needle)
            || self.id.as_str().to_lowercase().contains(&needle)
            || self.status.label().to_lowercase().contains(&needle)
            || self.total.to_string().contains(&needle)
    }
}

/// Request body for placing a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub items: Vec<SaleRequestItem>,
}

/// One requested line: the backend prices it from its own catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequestItem {
    pub product_id: ProductId,
    pub quantity: u32,
}
