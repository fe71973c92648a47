// Product catalog endpoints: products and categories.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{CategoryResponse, ProductPayload, ProductResponse};

impl ApiClient {
    /// Every product in the catalog.
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, Error> {
        self.list("products/", &[]).await
    }

    pub async fn get_product(&self, id: u64) -> Result<ProductResponse, Error> {
        self.get(&format!("products/{id}/")).await
    }

    pub async fn create_product(&self, body: &ProductPayload) -> Result<ProductResponse, Error> {
        self.post("products/", body).await
    }

    /// Partial update: only the fields set on `body` are sent.
    pub async fn update_product(
        &self,
        id: u64,
        body: &ProductPayload,
    ) -> Result<ProductResponse, Error> {
        self.patch(&format!("products/{id}/"), body).await
    }

    pub async fn delete_product(&self, id: u64) -> Result<(), Error> {
        self.delete(&format!("products/{id}/")).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, Error> {
        self.list("categories/", &[]).await
    }
}
