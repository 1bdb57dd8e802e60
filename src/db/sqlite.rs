use crate::db::models::{Account, AccountPatch, NewAccount};
use crate::db::schema::SQLITE_INIT;
use crate::error::ApiError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use tracing::warn;

pub type SqlitePool = Pool<Sqlite>;

const ACCOUNT_COLUMNS: &str = "id, name, cookie_token, account_id, created_at, updated_at";
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

#[derive(Clone)]
pub struct AccountsStorage {
    pool: SqlitePool,
}

impl AccountsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect (creating the file if needed) and apply the schema.
    pub async fn open(database_url: &str) -> Result<Self, ApiError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// All rows, newest first.
    pub async fn list(&self) -> Result<Vec<Account>, ApiError> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>, ApiError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Insert and read back the stored row in one round trip.
    pub async fn insert(&self, account: NewAccount) -> Result<Account, ApiError> {
        let now = timestamp(Utc::now());
        let account_id = account.account_id;
        let row = sqlx::query(&format!(
            "INSERT INTO accounts (name, cookie_token, account_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account.name)
        .bind(account.cookie_token)
        .bind(account.account_id)
        .bind(now.clone())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, Some(account_id)))?;
        Self::row_to_model(row)
    }

    /// Apply a non-empty patch. `Ok(None)` means no row with that id.
    ///
    /// `updated_at` is always written; the other SET clauses come only from
    /// fields present in the patch, each as a bound parameter.
    pub async fn update(&self, id: i64, patch: &AccountPatch) -> Result<Option<Account>, ApiError> {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE accounts SET updated_at = ");
        builder.push_bind(timestamp(Utc::now()));
        if let Some(name) = &patch.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(cookie_token) = &patch.cookie_token {
            builder.push(", cookie_token = ").push_bind(cookie_token.clone());
        }
        if let Some(account_id) = patch.account_id {
            builder.push(", account_id = ").push_bind(account_id);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING ").push(ACCOUNT_COLUMNS);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, patch.account_id))?;
        row.map(Self::row_to_model).transpose()
    }

    /// Returns the deleted id, or `None` when nothing matched.
    pub async fn delete(&self, id: i64) -> Result<Option<i64>, ApiError> {
        let deleted: Option<i64> =
            sqlx::query_scalar("DELETE FROM accounts WHERE id = ? RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(deleted)
    }

    fn row_to_model(row: SqliteRow) -> Result<Account, ApiError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let cookie_token: String = row.try_get("cookie_token")?;
        let account_id: i64 = row.try_get("account_id")?;
        let created_at_str: String = row.try_get("created_at")?;
        let updated_at_str: String = row.try_get("updated_at")?;

        Ok(Account {
            id,
            name,
            cookie_token,
            account_id,
            created_at: parse_timestamp(&created_at_str)?,
            updated_at: parse_timestamp(&updated_at_str)?,
        })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// RFC3339 as written by this service, or SQLite's `CURRENT_TIMESTAMP` form
/// (`YYYY-MM-DD HH:MM:SS`, UTC) for rows inserted by other clients.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP_FORMAT)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    Ok(naive.and_utc())
}

fn map_write_error(err: sqlx::Error, account_id: Option<i64>) -> ApiError {
    if let (sqlx::Error::Database(db_err), Some(account_id)) = (&err, account_id)
        && db_err.is_unique_violation()
    {
        warn!(account_id, "rejected duplicate account_id");
        return ApiError::DuplicateAccountId(account_id);
    }
    ApiError::DatabaseError(err)
}
