use std::sync::Arc;

use async_trait::async_trait;

use crate::product::errors::ProductError;
use crate::product::models::Product;
use crate::product::models::ProductId;
use crate::product::ports::ProductRepository;
use crate::product::ports::ProductServicePort;

/// Domain service implementation for catalog operations.
///
/// Thin pass-through to the repository; the catalog has no invariants of its
/// own beyond what the storage layer enforces.
pub struct ProductService<PR>
where
    PR: ProductRepository,
{
    repository: Arc<PR>,
}

impl<PR> ProductService<PR>
where
    PR: ProductRepository,
{
    /// Create a new product service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Product persistence implementation
    ///
    /// # Returns
    /// Configured product service instance
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<PR> ProductServicePort for ProductService<PR>
where
    PR: ProductRepository,
{
    async fn create_product(&self, product: Product) -> Result<Product, ProductError> {
        self.repository.create(product).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(*id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.repository.list_all().await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        product: Product,
    ) -> Result<Product, ProductError> {
        self.repository.update(id, product).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError> {
        self.repository.delete(id).await
    }
}
