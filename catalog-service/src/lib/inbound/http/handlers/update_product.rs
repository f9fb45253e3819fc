use axum::extract::Path;
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

/// Replace the product at the path id with the request body.
///
/// The body's full field set, the id included, overwrites the stored row.
pub async fn update_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<ApiSuccess<UpdateProductResponseData>, ApiError> {
    require_admin(&current_user.user)?;

    state
        .product_service
        .update_product(&ProductId(id), body.into_product())
        .await
        .map_err(ApiError::from)
        .map(|ref product| ApiSuccess::new(StatusCode::OK, product.into()))
}

/// HTTP request body for replacing a product (raw JSON)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateProductRequest {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
}

impl UpdateProductRequest {
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
pub struct UpdateProductResponseData {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

impl From<&Product> for UpdateProductResponseData {
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
