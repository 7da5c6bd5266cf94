use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, models::Session};

/// Header carrying the signed-in user's id, set by the identity provider
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER).ok_or_else(|| {
            AppError::Unauthorized(format!("Missing {} header", USER_ID_HEADER))
        })?;

        Ok(Session::new(
            user_id,
            header(parts, USER_NAME_HEADER).map(str::to_string),
        ))
    }
}
