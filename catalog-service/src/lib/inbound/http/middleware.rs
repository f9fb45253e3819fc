use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// Extension type carrying the caller resolved from the bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
}

const CREDENTIALS_MESSAGE: &str = "Could not validate credentials";

fn credentials_rejection() -> Response {
    ApiError::Unauthorized(CREDENTIALS_MESSAGE.to_string()).into_response()
}

/// Middleware that validates bearer tokens and resolves the caller identity.
///
/// A missing or malformed Authorization header, a bad signature, an expired
/// token, and a subject that no longer exists all collapse to the same
/// unauthorized response, so a caller cannot tell which check failed.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // Extract token from Authorization header
    let token = extract_token_from_header(&req)?;

    // Validate signature and expiry (from auth library)
    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        credentials_rejection()
    })?;

    let username = Username::new(claims.sub).map_err(|_| credentials_rejection())?;

    // A deleted account can still hold a syntactically valid token
    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                tracing::warn!(username = %username, "Token subject no longer exists");
                credentials_rejection()
            }
            e => {
                tracing::error!("Failed to resolve token subject: {}", e);
                ApiError::InternalServerError(e.to_string()).into_response()
            }
        })?;

    // Add the resolved caller to request extensions
    req.extensions_mut().insert(CurrentUser { user });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(credentials_rejection)?;

    let auth_str = auth_header.to_str().map_err(|_| credentials_rejection())?;

    if !auth_str.starts_with("Bearer ") {
        return Err(credentials_rejection());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}

/// Guard for routes that require a live account.
pub fn require_active(user: &User) -> Result<(), ApiError> {
    if user.is_active {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Inactive user".to_string()))
    }
}

/// Guard for routes that require the admin role.
///
/// Write handlers call this before any side effect.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if user.is_superuser {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Admin privileges required".to_string()))
    }
}
