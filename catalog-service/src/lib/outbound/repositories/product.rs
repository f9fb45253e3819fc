use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductRepository;
use crate::product::errors::ProductError;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

fn is_primary_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db_err| db_err.is_unique_violation() && db_err.constraint() == Some("products_pkey"))
        .unwrap_or(false)
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create(&self, product: Product) -> Result<Product, ProductError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_primary_key_violation(&e) {
                ProductError::AlreadyExists(product.id)
            } else {
                ProductError::DatabaseError(e.to_string())
            }
        })?;

        Ok(product)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, quantity
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(row.map(Product::from))
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, quantity
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, id: &ProductId, product: Product) -> Result<Product, ProductError> {
        // Full replacement; the row can move to a new id
        let result = sqlx::query(
            r#"
            UPDATE products
            SET id = $2, name = $3, description = $4, price = $5, quantity = $6
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(product.id.0)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_primary_key_violation(&e) {
                ProductError::AlreadyExists(product.id)
            } else {
                ProductError::DatabaseError(e.to_string())
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(*id));
        }

        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ProductError> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| ProductError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(ProductError::NotFound(*id));
        }

        Ok(())
    }
}
