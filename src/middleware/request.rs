use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::Value;

use crate::db::models::JsonObject;
use crate::error::ApiError;

/// JSON object body. An empty body reads as `{}`; anything that is not a
/// JSON object is rejected with an envelope error instead of axum's plain text.
#[derive(Debug, Clone)]
pub struct JsonObjectBody(pub JsonObject);

impl<S> FromRequest<S> for JsonObjectBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::InvalidBody(rejection.body_text())
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(JsonObject::new()));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(ApiError::InvalidBody(
                "request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(ApiError::InvalidBody(e.to_string())),
        }
    }
}

/// `{id}` path segment parsed as an integer primary key.
#[derive(Debug, Clone, Copy)]
pub struct AccountIdPath(pub i64);

impl<S> FromRequestParts<S> for AccountIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| {
                ApiError::Validation(format!(
                    "Path parameter 'id' must be an integer, got '{raw}'"
                ))
            })
    }
}
