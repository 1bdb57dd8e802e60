use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub cookie_token: String,
    pub account_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for `POST /api/accounts`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub cookie_token: String,
    pub account_id: i64,
}

impl NewAccount {
    /// Checks `name`, `cookie_token`, `account_id` in that order and reports the first bad field.
    pub fn from_json(body: &JsonObject) -> Result<Self, ApiError> {
        let name = required_text(body, "name")?;
        let cookie_token = required_text(body, "cookie_token")?;
        let account_id = required_integer(body, "account_id")?;
        Ok(Self {
            name,
            cookie_token,
            account_id,
        })
    }
}

/// Sparse update. Only these three columns are ever written by a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub cookie_token: Option<String>,
    pub account_id: Option<i64>,
}

impl AccountPatch {
    /// Keys outside the allow-list are ignored; a present key must hold a valid value.
    pub fn from_json(body: &JsonObject) -> Result<Self, ApiError> {
        Ok(Self {
            name: optional_text(body, "name")?,
            cookie_token: optional_text(body, "cookie_token")?,
            account_id: optional_integer(body, "account_id")?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.cookie_token.is_none() && self.account_id.is_none()
    }
}

fn text_value(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_owned)
}

fn required_text(body: &JsonObject, field: &str) -> Result<String, ApiError> {
    body.get(field).and_then(text_value).ok_or_else(|| {
        ApiError::Validation(format!(
            "Field '{field}' is required and must be a non-empty string"
        ))
    })
}

fn required_integer(body: &JsonObject, field: &str) -> Result<i64, ApiError> {
    body.get(field).and_then(Value::as_i64).ok_or_else(|| {
        ApiError::Validation(format!(
            "Field '{field}' is required and must be an integer"
        ))
    })
}

fn optional_text(body: &JsonObject, field: &str) -> Result<Option<String>, ApiError> {
    body.get(field)
        .map(|v| {
            text_value(v).ok_or_else(|| {
                ApiError::Validation(format!("Field '{field}' must be a non-empty string"))
            })
        })
        .transpose()
}

fn optional_integer(body: &JsonObject, field: &str) -> Result<Option<i64>, ApiError> {
    body.get(field)
        .map(|v| {
            v.as_i64().ok_or_else(|| {
                ApiError::Validation(format!("Field '{field}' must be an integer"))
            })
        })
        .transpose()
}
