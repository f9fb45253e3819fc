use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_product::create_product;
use super::handlers::current_user::current_user;
use super::handlers::delete_product::delete_product;
use super::handlers::get_product::get_product;
use super::handlers::list_products::list_products;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_product::update_product;
use super::middleware::authenticate as auth_middleware;
use crate::domain::product::service::ProductService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::product::PostgresProductRepository;
use crate::outbound::repositories::user::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub product_service: Arc<ProductService<PostgresProductRepository>>,
    pub authenticator: Arc<Authenticator>,
    pub jwt_expiration_minutes: i64,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository>>,
    product_service: Arc<ProductService<PostgresProductRepository>>,
    authenticator: Arc<Authenticator>,
    jwt_expiration_minutes: i64,
) -> Router {
    let state = AppState {
        user_service,
        product_service,
        authenticator,
        jwt_expiration_minutes,
    };

    // Catalog reads are open to any caller
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/token", post(login))
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product));

    // Identity resolution runs before every handler below; role and
    // active-flag checks stay in the handlers
    let protected_routes = Router::new()
        .route("/api/auth/me", get(current_user))
        .route("/api/products", post(create_product))
        .route(
            "/api/products/:id",
            put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
                headers = ?request.headers(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
