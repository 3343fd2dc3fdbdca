//! Product and category commands.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use vitrina_client::ApiClient;
use vitrina_core::{CategoryId, CategoryInput, Price, ProductId, ProductInput};

use super::{CommandError, accepted, print_json};

/// Parse a price argument such as `9.99`.
pub fn parse_price(raw: &str) -> Result<Price, CommandError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|e| CommandError::InvalidArgument(format!("price '{raw}': {e}")))?;
    Price::try_from(amount).map_err(|e| CommandError::InvalidArgument(format!("price '{raw}': {e}")))
}

pub async fn list_products(api: &ApiClient, category: Option<String>) -> Result<(), CommandError> {
    let category = category.map(CategoryId::from);
    let products = accepted(api.list_products(category.as_ref()).await?)?;
    print_json(&products)
}

pub async fn get_product(api: &ApiClient, id: String) -> Result<(), CommandError> {
    let product = accepted(api.get_product(&ProductId::from(id)).await?)?;
    print_json(&product)
}

pub async fn create_product(api: &ApiClient, input: ProductInput) -> Result<(), CommandError> {
    let product = accepted(api.create_product(&input).await?)?;
    print_json(&product)
}

pub async fn update_product(
    api: &ApiClient,
    id: String,
    input: ProductInput,
) -> Result<(), CommandError> {
    let product = accepted(api.update_product(&ProductId::from(id), &input).await?)?;
    print_json(&product)
}

pub async fn delete_product(api: &ApiClient, id: String) -> Result<(), CommandError> {
    accepted(api.delete_product(&ProductId::from(id.clone())).await?)?;
    print_json(&json!({ "deleted": id }))
}

pub async fn list_categories(api: &ApiClient) -> Result<(), CommandError> {
    let categories = accepted(api.list_categories().await?)?;
    print_json(&categories)
}

pub async fn get_category(api: &ApiClient, id: String) -> Result<(), CommandError> {
    let category = accepted(api.get_category(&CategoryId::from(id)).await?)?;
    print_json(&category)
}

pub async fn create_category(api: &ApiClient, input: CategoryInput) -> Result<(), CommandError> {
    let category = accepted(api.create_category(&input).await?)?;
    print_json(&category)
}

pub async fn update_category(
    api: &ApiClient,
    id: String,
    input: CategoryInput,
) -> Result<(), CommandError> {
    let category = accepted(api.update_category(&CategoryId::from(id), &input).await?)?;
    print_json(&category)
}

pub async fn delete_category(api: &ApiClient, id: String) -> Result<(), CommandError> {
    accepted(api.delete_category(&CategoryId::from(id.clone())).await?)?;
    print_json(&json!({ "deleted": id }))
}

/// Storefront view: categories with their products.
pub async fn browse(api: &ApiClient) -> Result<(), CommandError> {
    let catalog = api.catalog_or_placeholder().await?;
    let grouped: Vec<_> = catalog
        .iter()
        .map(|(category, products)| json!({ "category": category, "products": products }))
        .collect();
    print_json(&grouped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price(" 9.99 ").unwrap().display(), "$9.99");
        assert!(matches!(parse_price("-1"), Err(CommandError::InvalidArgument(_))));
        assert!(matches!(parse_price("cheap"), Err(CommandError::InvalidArgument(_))));
    }
}
