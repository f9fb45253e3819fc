use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::product::models::Product;
use crate::domain::product::models::ProductId;
use crate::domain::product::ports::ProductServicePort;
use crate::inbound::http::middleware::require_admin;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateProductRequest>,
) -> Result<ApiSuccess<CreateProductResponseData>, ApiError> {
    require_admin(&current_user.user)?;

    state
        .product_service
        .create_product(body.into_product())
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::CREATED, product.into()))
}

/// HTTP request body for adding a product (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateProductRequest {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
}

impl CreateProductRequest {
    fn into_product(self) -> Product {
        Product {
            id: ProductId(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProductResponseData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<&Product> for CreateProductResponseData {
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
