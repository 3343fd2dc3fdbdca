//! Sale and sale line normalizers.

use serde_json::Value;

use vitrina_core::{Sale, SaleItem};

use super::{Fields, Normalize, NormalizeError, keys};

impl Normalize for SaleItem {
    const ENTITY: &'static str = "sale item";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            sale_id: f.id(keys::SALE_ID)?,
            product_id: f.id(keys::PRODUCT_ID)?,
            quantity: f.positive_count(keys::QUANTITY)?,
            price: f.price(keys::PRICE)?,
            product: f.nested(keys::PRODUCT)?,
        })
    }
}

impl Normalize for Sale {
    const ENTITY: &'static str = "sale";

    fn normalize(raw: &Value) -> Result<Self, NormalizeError> {
        let f = Fields::new(Self::ENTITY, raw)?;
        Ok(Self {
            id: f.id(keys::ID)?,
            user_id: f.id(keys::USER_ID)?,
            status: f.parsed(keys::STATUS)?,
            total: f.price(keys::TOTAL)?,
            items: f.nested_list(keys::ITEMS)?,
            created_at: f.timestamp(keys::CREATED_AT)?,
            updated_at: f.timestamp(keys::UPDATED_AT)?,
            user: f.nested(keys::USER)?,
        })
    }
}

/// Normalize a raw sale line, including its product snapshot if present.
///
/// # Errors
///
/// Returns [`NormalizeError`] if a required field is missing, the quantity is
/// not positive, or the price is invalid.
pub fn normalize_sale_item(raw: &Value) -> Result<SaleItem, NormalizeError> {
    SaleItem::normalize(raw)
}

/// Normalize a raw sale with its lines and buyer snapshot.
///
/// # Errors
///
/// Returns [`NormalizeError`] if the sale or any of its lines is invalid.
pub fn normalize_sale(raw: &Value) -> Result<Sale, NormalizeError> {
    Sale::normalize(raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;
    use vitrina_core::SaleStatus;

    use super::*;

    fn go_sale() -> Value {
        json!({
            "ID": 42,
            "UserID": 7,
            "Status": "planificada",
            "Total": "25.50",
            "Items": [
                {"ID": 1, "SaleID": 42, "ProductID": 3, "Quantity": 3, "Price": 8.5}
            ],
            "CreatedAt": "2024-05-01T10:00:00Z",
            "UpdatedAt": "2024-05-01T10:00:00Z",
            "User": {"ID": 7, "Email": "ana@example.com", "Name": "Ana", "Role": "cliente"}
        })
    }

    #[test]
    fn test_go_style_sale() {
        let sale = normalize_sale(&go_sale()).unwrap();
        assert_eq!(sale.id.as_str(), "42");
        assert_eq!(sale.user_id.as_str(), "7");
        assert_eq!(sale.status, SaleStatus::Scheduled);
        assert_eq!(sale.total.amount(), Decimal::new(2550, 2));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].quantity, 3);
        assert_eq!(sale.user.as_ref().unwrap().email, "ana@example.com");
    }

    #[test]
    fn test_items_default_to_empty() {
        let mut raw = go_sale();
        raw.as_object_mut().unwrap().remove("Items");
        assert!(normalize_sale(&raw).unwrap().items.is_empty());

        raw["items"] = json!("not a list");
        assert!(normalize_sale(&raw).unwrap().items.is_empty());
    }

    #[test]
    fn test_english_status_accepted() {
        let mut raw = go_sale();
        raw["Status"] = json!("Cancelled");
        assert_eq!(normalize_sale(&raw).unwrap().status, SaleStatus::Cancelled);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = normalize_sale_item(&json!({
            "id": "i1", "saleId": "s1", "productId": "p1", "quantity": 0, "price": 1
        }))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidField { field: "quantity", .. }));
    }

    #[test]
    fn test_invalid_line_fails_sale() {
        let mut raw = go_sale();
        raw["Items"] = json!([{"ID": 1, "SaleID": 42, "ProductID": 3, "Price": 8.5}]);
        assert!(matches!(
            normalize_sale(&raw).unwrap_err(),
            NormalizeError::MissingField {
                entity: "sale item",
                field: "quantity"
            }
        ));
    }

    #[test]
    fn test_idempotence() {
        let once = normalize_sale(&go_sale()).unwrap();
        let twice = normalize_sale(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }
}
