use axum::Json;

use crate::error::ApiError;
use crate::types::envelope::ApiResponse;

/// GET /api
pub async fn api_status() -> Json<ApiResponse<()>> {
    Json(ApiResponse::ok("API is running."))
}

pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
