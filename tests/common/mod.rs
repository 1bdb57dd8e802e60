#![allow(dead_code)]

use accounts_gateway::{
    AppState, api::verse_api::VerseApi, app_router, db::sqlite::AccountsStorage,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;
use url::Url;

pub const SECRET: &str = "test-secret";

static DB_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestApp {
    pub router: Router,
    pub storage: AccountsStorage,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = fs::remove_file(format!("{}{}", self.db_path.display(), suffix));
        }
    }
}

fn temp_db_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "accounts-gateway-{}-{}-{}.sqlite",
        std::process::id(),
        nanos,
        DB_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path
}

pub async fn spawn_app(secret: Option<&str>) -> TestApp {
    // Nothing listens on the discard port; accounts tests never reach it.
    spawn_app_with_verse(secret, "http://127.0.0.1:9/api/1", Duration::from_millis(200)).await
}

pub async fn spawn_app_with_verse(
    secret: Option<&str>,
    verse_base_url: &str,
    verse_timeout: Duration,
) -> TestApp {
    let db_path = temp_db_path();
    let storage = AccountsStorage::open(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open test database");
    let verse = VerseApi::new(
        Url::parse(verse_base_url).expect("invalid verse url"),
        verse_timeout,
    )
    .expect("failed to build verse client");
    let state = AppState::new(storage.clone(), secret.map(Arc::from), verse);
    TestApp {
        router: app_router(state),
        storage,
        db_path,
    }
}

impl TestApp {
    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.db_path.display())
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("failed to build request");
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not json")
        };
        (status, body)
    }

    /// Authorized call with the shared test secret.
    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(method, uri, Some(SECRET), body).await
    }
}
