use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Product;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProductListItemData>>, ApiError> {
    state
        .product_service
        .list_products()
        .await
        .map_err(ApiError::from)
        .map(|products| {
            ApiSuccess::new(
                StatusCode::OK,
                products.iter().map(ProductListItemData::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListItemData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<&Product> for ProductListItemData {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.0,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
        }
    }
}
