//! Sale commands.

use serde_json::json;

use vitrina_client::ApiClient;
use vitrina_core::{Sale, SaleId, SaleStatus, UserId};

use super::{CommandError, accepted, print_json};

/// List sales, optionally for one buyer and filtered by a search term.
pub async fn list(
    api: &ApiClient,
    user: Option<String>,
    search: Option<String>,
) -> Result<(), CommandError> {
    let user = user.map(UserId::from);
    let sales = accepted(api.list_sales(user.as_ref()).await?)?;
    let term = search.unwrap_or_default();
    let matching: Vec<&Sale> = sales.iter().filter(|s| s.matches(&term)).collect();
    print_json(&matching)
}

/// Show one sale with its unit count and per-line totals.
pub async fn get(api: &ApiClient, id: String) -> Result<(), CommandError> {
    let sale = accepted(api.get_sale(&SaleId::from(id)).await?)?;
    let line_totals: Vec<String> = sale.items.iter().map(|i| i.line_total().display()).collect();
    print_json(&json!({
        "sale": sale,
        "units": sale.unit_count(),
        "lineTotals": line_totals,
    }))
}

/// Admin status change, checked against the sale's current status first.
pub async fn set_status(api: &ApiClient, id: String, status: SaleStatus) -> Result<(), CommandError> {
    let sale = accepted(api.get_sale(&SaleId::from(id)).await?)?;
    let updated = accepted(api.change_sale_status(&sale, status).await?)?;
    print_json(&updated)
}

/// Customer cancellation of a pending sale.
pub async fn cancel(api: &ApiClient, id: String) -> Result<(), CommandError> {
    let sale = accepted(api.get_sale(&SaleId::from(id)).await?)?;
    let cancelled = accepted(api.cancel_own_sale(&sale).await?)?;
    print_json(&cancelled)
}
