use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::info;

use crate::db::models::{Account, AccountPatch, NewAccount};
use crate::error::ApiError;
use crate::middleware::request::{AccountIdPath, JsonObjectBody};
use crate::router::AppState;
use crate::types::envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct DeletedAccount {
    pub id: i64,
}

/// GET /api/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Account>>>, ApiError> {
    let accounts = state.storage.list().await?;
    Ok(Json(ApiResponse::with_data(
        "Accounts retrieved successfully",
        accounts,
    )))
}

/// GET /api/accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    AccountIdPath(id): AccountIdPath,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let account = state
        .storage
        .get_by_id(id)
        .await?
        .ok_or(ApiError::AccountNotFound(id))?;
    Ok(Json(ApiResponse::with_data(
        "Account retrieved successfully",
        account,
    )))
}

/// POST /api/accounts
pub async fn create_account(
    State(state): State<AppState>,
    JsonObjectBody(body): JsonObjectBody,
) -> Result<(StatusCode, Json<ApiResponse<Account>>), ApiError> {
    let new_account = NewAccount::from_json(&body)?;
    let account = state.storage.insert(new_account).await?;
    info!(id = account.id, account_id = account.account_id, "account created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_data("Account created successfully", account)),
    ))
}

/// PUT /api/accounts/{id}
pub async fn update_account(
    State(state): State<AppState>,
    AccountIdPath(id): AccountIdPath,
    JsonObjectBody(body): JsonObjectBody,
) -> Result<Json<ApiResponse<Account>>, ApiError> {
    let patch = AccountPatch::from_json(&body)?;
    if patch.is_empty() {
        return Err(ApiError::NoFieldsToUpdate);
    }
    let account = state
        .storage
        .update(id, &patch)
        .await?
        .ok_or(ApiError::AccountNotFound(id))?;
    info!(id, "account updated");
    Ok(Json(ApiResponse::with_data(
        "Account updated successfully",
        account,
    )))
}

/// DELETE /api/accounts/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    AccountIdPath(id): AccountIdPath,
) -> Result<Json<ApiResponse<DeletedAccount>>, ApiError> {
    let id = state
        .storage
        .delete(id)
        .await?
        .ok_or(ApiError::AccountNotFound(id))?;
    info!(id, "account deleted");
    Ok(Json(ApiResponse::with_data(
        "Account deleted successfully",
        DeletedAccount { id },
    )))
}
