use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::ApiError;
use crate::router::AppState;

/// Ensure the inbound request carries `Authorization: Bearer <secret>`.
///
/// Fails closed: without a configured secret every request is refused with
/// `MissingSecret`, never let through.
pub fn ensure_bearer(headers: &HeaderMap, expected: Option<&str>) -> Result<(), ApiError> {
    let Some(expected) = expected else {
        return Err(ApiError::MissingSecret);
    };

    let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
        debug!("bearer token missing or malformed");
        return Err(ApiError::Unauthorized);
    };

    if bool::from(bearer.token().as_bytes().ct_eq(expected.as_bytes())) {
        Ok(())
    } else {
        debug!("bearer token mismatch");
        Err(ApiError::Unauthorized)
    }
}

/// Route-layer guard for the accounts namespace.
#[derive(Debug, Clone, Copy)]
pub struct RequireBearer;

impl FromRequestParts<AppState> for RequireBearer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        ensure_bearer(&parts.headers, state.secret_key.as_deref())?;
        Ok(Self)
    }
}
