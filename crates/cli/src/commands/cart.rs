//! Local cart commands and checkout.

use serde_json::json;

use vitrina_client::{ApiClient, Checkout};
use vitrina_core::{Cart, ProductId};

use super::{CommandError, accepted, print_json};

fn print_cart(cart: &Cart) -> Result<(), CommandError> {
    print_json(&json!({
        "items": cart.items(),
        "units": cart.unit_count(),
        "total": cart.total().display(),
    }))
}

pub fn show(api: &ApiClient) -> Result<(), CommandError> {
    print_cart(&api.cart().load())
}

/// Fetch the product and add it to the cart.
pub async fn add(api: &ApiClient, product_id: String, quantity: u32) -> Result<(), CommandError> {
    let product = accepted(api.get_product(&ProductId::from(product_id)).await?)?;
    let (cart, ()) = api.cart().update(|cart| cart.add(product, quantity))?;
    print_cart(&cart)
}

/// Set a line's quantity; zero removes the line.
pub fn set(api: &ApiClient, product_id: String, quantity: u32) -> Result<(), CommandError> {
    let id = ProductId::from(product_id);
    let (cart, found) = api.cart().update(|cart| cart.set_quantity(&id, quantity))?;
    if !found {
        return Err(CommandError::InvalidArgument(format!("product {id} is not in the cart")));
    }
    print_cart(&cart)
}

pub fn remove(api: &ApiClient, product_id: String) -> Result<(), CommandError> {
    let id = ProductId::from(product_id);
    let (cart, found) = api.cart().update(|cart| cart.remove(&id))?;
    if !found {
        return Err(CommandError::InvalidArgument(format!("product {id} is not in the cart")));
    }
    print_cart(&cart)
}

pub fn clear(api: &ApiClient) -> Result<(), CommandError> {
    api.cart().clear()?;
    print_cart(&Cart::new())
}

pub async fn checkout(api: &ApiClient) -> Result<(), CommandError> {
    match api.checkout().await? {
        Checkout::Placed(sale) => print_json(&sale),
        Checkout::EmptyCart => Err(CommandError::InvalidArgument("the cart is empty".to_string())),
        Checkout::LoginRequired => Err(CommandError::NotSignedIn),
        Checkout::Rejected(rejection) => Err(rejection.into()),
    }
}
