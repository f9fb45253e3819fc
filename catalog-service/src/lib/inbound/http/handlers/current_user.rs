use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::require_active;
use crate::inbound::http::middleware::CurrentUser;

/// Return the account behind the presented token.
pub async fn current_user(
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<CurrentUserResponseData>, ApiError> {
    require_active(&current_user.user)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        (&current_user.user).into(),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<&User> for CurrentUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_ref().map(|e| e.as_str().to_string()),
            is_active: user.is_active,
            is_superuser: user.is_superuser,
        }
    }
}
