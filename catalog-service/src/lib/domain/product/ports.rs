use async_trait::async_trait;

use crate::product::errors::ProductError;
use crate::product::models::Product;
use crate::product::models::ProductId;

/// Port for product domain service operations.
#[async_trait]
pub trait ProductServicePort: Send + Sync + 'static {
    /// Add a new product to the catalog.
    ///
    /// # Arguments
    /// * `product` - Product to create, including its caller-supplied id
    ///
    /// # Returns
    /// Created product
    ///
    /// # Errors
    /// * `AlreadyExists` - A product with this id is already in the catalog
    /// * `DatabaseError` - Database operation failed
    async fn create_product(&self, product: Product) -> Result<Product, ProductError>;

    /// Retrieve a product by id.
    ///
    /// # Arguments
    /// * `id` - Product id
    ///
    /// # Returns
    /// Product
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_product(&self, id: &ProductId) -> Result<Product, ProductError>;

    /// List the whole catalog.
    ///
    /// # Returns
    /// All products, ordered by id
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;

    /// Replace an existing product.
    ///
    /// Every field of the stored row, including the id, is overwritten with
    /// the given product. No write happens when the id is absent.
    ///
    /// # Arguments
    /// * `id` - Id of the product to replace
    /// * `product` - Full replacement value
    ///
    /// # Returns
    /// The replacement product
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_product(&self, id: &ProductId, product: Product)
        -> Result<Product, ProductError>;

    /// Remove a product from the catalog.
    ///
    /// # Arguments
    /// * `id` - Product id to delete
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `NotFound` - Product does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_product(&self, id: &ProductId) -> Result<(), ProductError>;
}

/// Persistence operations for product aggregate.
#[async_trait]
pub trait ProductRepository: Send + Sync + 'static {
    /// Persist a new product.
    ///
    /// # Errors
    /// * `AlreadyExists` - A product with this id is already stored
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, product: Product) -> Result<Product, ProductError>;

    /// Retrieve a product by id.
    ///
    /// # Returns
    /// Product if found, None otherwise
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Retrieve all products ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Product>, ProductError>;

    /// Overwrite the row at `id` with `product`, id included.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `AlreadyExists` - The replacement id collides with another row
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &ProductId, product: Product) -> Result<Product, ProductError>;

    /// Remove the row at `id`.
    ///
    /// # Errors
    /// * `NotFound` - No row with this id
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &ProductId) -> Result<(), ProductError>;
}
