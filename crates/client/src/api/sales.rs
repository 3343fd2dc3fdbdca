//! Sale operations and the client-side status workflow.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use vitrina_core::{Sale, SaleId, SaleRequest, SaleStatus, TransitionError, UserId};

use super::client::Call;
use super::{ApiClient, GatewayError, Outcome};

/// Errors from status changes checked before reaching the backend.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The change is not allowed from the sale's current status.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[derive(Serialize)]
struct StatusChange {
    status: SaleStatus,
}

impl ApiClient {
    /// List sales, optionally only those placed by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn list_sales(
        &self,
        user: Option<&UserId>,
    ) -> Result<Outcome<Vec<Sale>>, GatewayError> {
        let call = Call::get(&["sales"]).query("userId", user.map(UserId::as_str));
        self.fetch_list(call).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the sale does not exist or
    /// the backend is unavailable.
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: &SaleId) -> Result<Outcome<Sale>, GatewayError> {
        self.fetch_one(Call::get(&["sales", id.as_str()])).await
    }

    /// Place a sale. The backend prices it and computes the total.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn create_sale(&self, request: &SaleRequest) -> Result<Outcome<Sale>, GatewayError> {
        self.fetch_one(Call::post(&["sales"]).json(request)?).await
    }

    /// Set a sale's status without client-side checks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn update_sale_status(
        &self,
        id: &SaleId,
        status: SaleStatus,
    ) -> Result<Outcome<Sale>, GatewayError> {
        let segments = ["sales", id.as_str(), "status"];
        let call = Call::patch(&segments).json(&StatusChange { status })?;
        self.fetch_one(call).await
    }

    /// Cancel a sale without client-side checks.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn cancel_sale(&self, id: &SaleId) -> Result<Outcome<Sale>, GatewayError> {
        self.fetch_one(Call::patch(&["sales", id.as_str(), "cancel"]))
            .await
    }

    /// Admin status change. Cancelled sales cannot be modified and the new
    /// status must differ from the current one.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Transition`] without calling the backend if
    /// the change is not allowed.
    #[instrument(skip(self, sale), fields(sale_id = %sale.id, from = %sale.status))]
    pub async fn change_sale_status(
        &self,
        sale: &Sale,
        next: SaleStatus,
    ) -> Result<Outcome<Sale>, WorkflowError> {
        let next = sale.status.transition_to(next)?;
        let outcome = self.update_sale_status(&sale.id, next).await?;
        if let Outcome::Ok(updated) = &outcome {
            info!(to = %updated.status, "Sale status changed");
        }
        Ok(outcome)
    }

    /// Customer cancellation. Only pending sales can be cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Transition`] without calling the backend if
    /// the sale is not pending.
    #[instrument(skip(self, sale), fields(sale_id = %sale.id, from = %sale.status))]
    pub async fn cancel_own_sale(&self, sale: &Sale) -> Result<Outcome<Sale>, WorkflowError> {
        sale.status.customer_cancel()?;
        let outcome = self.cancel_sale(&sale.id).await?;
        if outcome.rejection().is_none() {
            info!("Sale cancelled by customer");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_uses_wire_value() {
        let body = serde_json::to_value(StatusChange {
            status: SaleStatus::Fulfilled,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "realizada"}));
    }
}
