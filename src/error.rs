use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use std::any::Any;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::error;

use crate::types::envelope::ApiResponse;

#[derive(Debug, ThisError)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error("No fields to update")]
    NoFieldsToUpdate,

    #[error("Account with ID {0} does not exist")]
    AccountNotFound(i64),

    #[error("Account with account_id {0} already exists")]
    DuplicateAccountId(i64),

    #[error("Missing or invalid bearer token")]
    Unauthorized,

    #[error("No secret key configured for the accounts namespace")]
    MissingSecret,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream responded with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Upstream did not answer within {0:?}")]
    UpstreamTimeout(Duration),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) | ApiError::NoFieldsToUpdate => {
                StatusCode::BAD_REQUEST
            }
            ApiError::AccountNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::DuplicateAccountId(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Reqwest(_)
            | ApiError::UrlParse(_)
            | ApiError::UpstreamStatus(_)
            | ApiError::UpstreamTimeout(_) => StatusCode::BAD_GATEWAY,
            ApiError::MissingSecret | ApiError::DatabaseError(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short, client-facing summary. The detail goes into the envelope's `error`.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::InvalidBody(_) => "Invalid request body",
            ApiError::NoFieldsToUpdate => "No fields to update",
            ApiError::AccountNotFound(_) => "Account not found",
            ApiError::DuplicateAccountId(_) => "Account already exists",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::MissingSecret => "Server configuration error",
            ApiError::DatabaseError(_) => "Database operation failed",
            ApiError::Reqwest(_)
            | ApiError::UrlParse(_)
            | ApiError::UpstreamStatus(_)
            | ApiError::UpstreamTimeout(_) => "Failed to fetch verse",
            ApiError::RouteNotFound => "Route not found",
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        }
        let body = ApiResponse::<()>::failure(self.message(), self.to_string());
        let mut resp = (status, Json(body)).into_response();
        if matches!(self, ApiError::Unauthorized) {
            resp.headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

/// Last-resort handler for panics escaping a route; keeps the envelope shape.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "Unknown error".to_string()
    };
    ApiError::Internal(detail).into_response()
}
