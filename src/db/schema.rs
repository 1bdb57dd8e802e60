//! SQL DDL for the account storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT, so ids are never handed out twice
/// - `account_id` UNIQUE; violations surface as 409 on create/update
/// - timestamps as fixed-width RFC3339 text, which sorts chronologically
/// - index on `created_at` for the newest-first listing
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    cookie_token TEXT NOT NULL,
    account_id INTEGER NOT NULL UNIQUE,
    created_at TEXT NOT NULL, -- RFC3339, microseconds, UTC
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accounts_created_at ON accounts(created_at);
"#;
