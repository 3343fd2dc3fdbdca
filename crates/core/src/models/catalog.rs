//! Catalog entities: categories and products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product offered in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category_id: CategoryId,
    /// Units in stock. `None` means stock is not tracked for this product;
    /// `Some(0)` means it is out of stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Denormalized copy of the owning category, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Product {
    /// Whether the product is known to be out of stock.
    ///
    /// Untracked stock is never reported as out of stock.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock == Some(0)
    }
}

/// Request body for creating or updating a category.
///
/// Absent fields are left out of the payload so updates stay partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Request body for creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

/// Group products under their categories, preserving category order.
///
/// Products whose category is not in `categories` are dropped, matching the
/// storefront listing which only renders known categories.
#[must_use]
pub fn group_by_category(
    categories: Vec<Category>,
    products: &[Product],
) -> Vec<(Category, Vec<Product>)> {
    categories
        .into_iter()
        .map(|category| {
            let members = products
                .iter()
                .filter(|p| p.category_id == category.id)
                .cloned()
                .collect();
            (category, members)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn ts() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    fn category(id: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: format!("Category {id}"),
            description: None,
            image: None,
            created_at: ts(),
            updated_at: ts(),
        }
    }

    fn product(id: &str, category_id: &str, stock: Option<u32>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(Decimal::new(500, 2)).unwrap(),
            image: String::new(),
            category_id: CategoryId::new(category_id),
            stock,
            created_at: ts(),
            updated_at: ts(),
            category: None,
        }
    }

    #[test]
    fn test_out_of_stock_distinguishes_untracked() {
        assert!(product("p1", "c1", Some(0)).is_out_of_stock());
        assert!(!product("p2", "c1", None).is_out_of_stock());
        assert!(!product("p3", "c1", Some(4)).is_out_of_stock());
    }

    #[test]
    fn test_group_by_category_preserves_order() {
        let products = vec![
            product("p1", "c2", None),
            product("p2", "c1", None),
            product("p3", "c2", None),
            product("p4", "orphan", None),
        ];
        let grouped = group_by_category(vec![category("c2"), category("c1")], &products);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0.id.as_str(), "c2");
        assert_eq!(
            grouped[0].1.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            vec!["p1", "p3"]
        );
        assert_eq!(grouped[1].1.len(), 1);
    }

    #[test]
    fn test_product_input_skips_absent_fields() {
        let input = ProductInput {
            name: Some("Widget".to_string()),
            category_id: Some(CategoryId::new("c1")),
            ..Default::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Widget", "categoryId": "c1"}));
    }
}
