use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::utils::error::AppError;

const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity, resolved upstream. The auth gateway verifies the
/// session token and forwards the user id in `x-user-id`; this service
/// never sees credentials.
pub struct CurrentUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError("You must be logged in.".to_string()))?;

        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::AuthError("Invalid session user id".to_string()))?;

        Ok(CurrentUser(id))
    }
}
