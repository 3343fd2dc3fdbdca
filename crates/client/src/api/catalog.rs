//! Product and category operations.

use tracing::{debug, instrument, warn};

use vitrina_core::{
    Category, CategoryId, CategoryInput, Product, ProductId, ProductInput, group_by_category,
};

use super::client::Call;
use super::{ApiClient, GatewayError, Outcome};

/// Categories in backend order, each with its products.
pub type Catalog = Vec<(Category, Vec<Product>)>;

impl ApiClient {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// List products, optionally only those in `category`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<Outcome<Vec<Product>>, GatewayError> {
        let call = Call::get(&["products"]).query("categoryId", category.map(CategoryId::as_str));
        self.fetch_list(call).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the product does not exist or
    /// the backend is unavailable.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Outcome<Product>, GatewayError> {
        self.fetch_one(Call::get(&["products", id.as_str()])).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, input))]
    pub async fn create_product(
        &self,
        input: &ProductInput,
    ) -> Result<Outcome<Product>, GatewayError> {
        self.fetch_one(Call::post(&["products"]).json(input)?).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Outcome<Product>, GatewayError> {
        self.fetch_one(Call::put(&["products", id.as_str()]).json(input)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Outcome<()>, GatewayError> {
        self.fetch_unit(Call::delete(&["products", id.as_str()])).await
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Outcome<Vec<Category>>, GatewayError> {
        self.fetch_list(Call::get(&["categories"])).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the category does not exist or
    /// the backend is unavailable.
    #[instrument(skip(self))]
    pub async fn get_category(&self, id: &CategoryId) -> Result<Outcome<Category>, GatewayError> {
        self.fetch_one(Call::get(&["categories", id.as_str()])).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, input))]
    pub async fn create_category(
        &self,
        input: &CategoryInput,
    ) -> Result<Outcome<Category>, GatewayError> {
        self.fetch_one(Call::post(&["categories"]).json(input)?).await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self, input))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Outcome<Category>, GatewayError> {
        self.fetch_one(Call::put(&["categories", id.as_str()]).json(input)?)
            .await
    }

    /// # Errors
    ///
    /// Returns [`GatewayError`] if the backend is unavailable or fails.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<Outcome<()>, GatewayError> {
        self.fetch_unit(Call::delete(&["categories", id.as_str()])).await
    }

    // -------------------------------------------------------------------------
    // Storefront listing
    // -------------------------------------------------------------------------

    /// Categories with their products, as shown on the storefront.
    ///
    /// An unavailable backend or a rejected listing yields an empty catalog
    /// so the storefront can still render.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] only for server-side failures.
    #[instrument(skip(self))]
    pub async fn catalog_or_placeholder(&self) -> Result<Catalog, GatewayError> {
        let categories = match self.list_categories().await {
            Ok(outcome) => outcome,
            Err(e) if e.is_unavailable() => {
                debug!("Backend unavailable, showing empty catalog");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        let products = match self.list_products(None).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_unavailable() => {
                debug!("Backend unavailable, showing empty catalog");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match (categories, products) {
            (Outcome::Ok(categories), Outcome::Ok(products)) => {
                Ok(group_by_category(categories, &products))
            }
            (Outcome::Rejected(rejection), _) | (_, Outcome::Rejected(rejection)) => {
                warn!(status = rejection.status, message = %rejection.message, "Catalog listing rejected");
                Ok(Vec::new())
            }
        }
    }
}
