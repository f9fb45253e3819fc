use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::models::Username;

const LOGIN_FAILED_MESSAGE: &str = "Incorrect username or password";

/// Exchange form-encoded credentials for a bearer token.
///
/// An unknown username and a wrong password produce byte-identical
/// unauthorized responses; the active flag is not consulted here.
pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A username that fails validation cannot belong to any account
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized(LOGIN_FAILED_MESSAGE.to_string()))?;

    // Get user from database
    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByUsername(_) => {
                ApiError::Unauthorized(LOGIN_FAILED_MESSAGE.to_string())
            }
            _ => ApiError::from(e),
        })?;

    // The role as of this moment is baked into the token
    let claims = auth::Claims::for_user(
        user.username.as_str(),
        user.is_superuser,
        state.jwt_expiration_minutes,
    );

    // Verify password and generate token
    let result = state
        .authenticator
        .authenticate(&body.password, &user.password_hash, &claims)
        .map_err(|e| match e {
            auth::AuthenticationError::InvalidCredentials => {
                ApiError::Unauthorized(LOGIN_FAILED_MESSAGE.to_string())
            }
            auth::AuthenticationError::JwtError(err) => {
                ApiError::InternalServerError(format!("Token generation failed: {}", err))
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token: result.access_token,
            token_type: "bearer".to_string(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
}
