//! Category and product normalizers.

use serde_json::Value;

use vitrina_core::{Category, Product};

use super::{Fields, Normalize, NormalizeError, keys};

impl Normalize for Category {
    const ENTITY: &'static str = "category";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            name: f.string(keys::NAME)?,
            description: f.optional_string(keys::DESCRIPTION)?,
            image: f.optional_string(keys::IMAGE)?,
            created_at: f.timestamp(keys::CREATED_AT)?,
            updated_at: f.timestamp(keys::UPDATED_AT)?,
        })
    }
}

impl Normalize for Product {
    const ENTITY: &'static str = "product";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            name: f.string(keys::NAME)?,
            description: f.optional_string(keys::DESCRIPTION)?.unwrap_or_default(),
            price: f.price(keys::PRICE)?,
            image: f.optional_string(keys::IMAGE)?.unwrap_or_default(),
            category_id: f.id(keys::CATEGORY_ID)?,
            stock: f.optional_count(keys::STOCK)?,
            created_at: f.timestamp(keys::CREATED_AT)?,
            updated_at: f.timestamp(keys::UPDATED_AT)?,
            category: f.nested(keys::CATEGORY)?,
        })
    }
}

/// Normalize a raw category payload.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a required field is missing or invalid.
pub fn normalize_category(raw: &Value) -> Result<Category, NormalizeError> {
    Category::normalize(raw)
}

/// Normalize a raw product payload, including its embedded category if present.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a required field is missing or invalid.
pub fn normalize_product(raw: &Value) -> Result<Product, NormalizeError> {
    Product::normalize(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::normalize::normalize_list;

    fn pascal_product() -> Value {
        json!({
            "ID": "p1",
            "Name": "Widget",
            "Description": "A widget",
            "Price": 9.99,
            "Image": "/img/widget.png",
            "Stock": 0,
            "CategoryID": "c1",
            "CreatedAt": "2024-05-01T10:00:00Z",
            "UpdatedAt": "2024-05-02T10:00:00Z"
        })
    }

    #[test]
    fn test_pascal_case_product() {
        let product = normalize_product(&pascal_product()).unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price.amount(), Decimal::new(999, 2));
        assert_eq!(product.stock, Some(0));
        assert!(product.is_out_of_stock());
        assert_eq!(product.category_id.as_str(), "c1");
        assert!(product.category.is_none());
    }

    #[test]
    fn test_casing_independence() {
        let camel = json!({
            "id": "p1",
            "name": "Widget",
            "description": "A widget",
            "price": 9.99,
            "image": "/img/widget.png",
            "stock": 0,
            "categoryId": "c1",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T10:00:00Z"
        });
        let mixed = json!({
            "id": "p1",
            "Name": "Widget",
            "description": "A widget",
            "Price": "9.99",
            "image": "/img/widget.png",
            "Stock": 0,
            "category_id": "c1",
            "created_at": "2024-05-01T10:00:00Z",
            "UpdatedAt": "2024-05-02T10:00:00Z"
        });

        let expected = normalize_product(&pascal_product()).unwrap();
        assert_eq!(normalize_product(&camel).unwrap(), expected);
        assert_eq!(normalize_product(&mixed).unwrap(), expected);
    }

    #[test]
    fn test_canonical_serialization() {
        let product = normalize_product(&pascal_product()).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], "p1");
        assert_eq!(value["name"], "Widget");
        assert_eq!(value["price"], json!(9.99));
        assert_eq!(value["stock"], 0);
        assert_eq!(value["categoryId"], "c1");
        assert!(value.get("ID").is_none());
    }

    #[test]
    fn test_idempotence() {
        let mut raw = pascal_product();
        raw["Category"] = json!({
            "ID": 7,
            "Name": "Tools",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        });
        let once = normalize_product(&raw).unwrap();
        let twice = normalize_product(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.category.unwrap().id.as_str(), "7");
    }

    #[test]
    fn test_idempotence_with_precise_string_price() {
        let mut raw = pascal_product();
        raw["Price"] = json!("0.1234567890123456789");
        let once = normalize_product(&raw).unwrap();
        let twice = normalize_product(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.price.to_string(), "0.1234567890123456789");
    }

    #[test]
    fn test_absent_stock_is_untracked() {
        let mut raw = pascal_product();
        raw.as_object_mut().unwrap().remove("Stock");
        let product = normalize_product(&raw).unwrap();
        assert_eq!(product.stock, None);
        assert!(!product.is_out_of_stock());

        raw["stock"] = Value::Null;
        assert_eq!(normalize_product(&raw).unwrap().stock, None);
    }

    #[test]
    fn test_zero_price_is_present() {
        let mut raw = pascal_product();
        raw["Price"] = json!(0);
        let product = normalize_product(&raw).unwrap();
        assert!(product.price.amount().is_zero());
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = pascal_product();
        raw.as_object_mut().unwrap().remove("CategoryID");
        assert_eq!(
            normalize_product(&raw).unwrap_err(),
            NormalizeError::MissingField {
                entity: "product",
                field: "categoryId"
            }
        );
    }

    #[test]
    fn test_negative_price_is_invalid() {
        let mut raw = pascal_product();
        raw["Price"] = json!(-1);
        assert!(matches!(
            normalize_product(&raw).unwrap_err(),
            NormalizeError::InvalidField { field: "price", .. }
        ));
    }

    #[test]
    fn test_negative_stock_is_invalid() {
        let mut raw = pascal_product();
        raw["Stock"] = json!(-3);
        assert!(matches!(
            normalize_product(&raw).unwrap_err(),
            NormalizeError::InvalidField { field: "stock", .. }
        ));
    }

    #[test]
    fn test_category_optional_fields_stay_absent() {
        let category = normalize_category(&json!({
            "ID": "c1",
            "Name": "Tools",
            "CreatedAt": "2024-01-01T00:00:00Z",
            "UpdatedAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(category.description, None);
        assert_eq!(category.image, None);
    }

    #[test]
    fn test_list_skips_malformed_rows() {
        let products: Vec<Product> =
            normalize_list(&json!([pascal_product(), {"ID": "broken"}, pascal_product()]));
        assert_eq!(products.len(), 2);
    }
}
