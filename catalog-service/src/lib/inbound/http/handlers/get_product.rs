use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<ApiSuccess<GetProductResponseData>, ApiError> {
    state
        .product_service
        .get_product(&ProductId(id))
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetProductResponseData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<&Product> for GetProductResponseData {
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
