mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use common::{SECRET, spawn_app};
use serde_json::json;

#[tokio::test]
async fn accounts_routes_require_a_bearer_token() {
    let app = spawn_app(Some(SECRET)).await;
    let payload = json!({"name": "A", "cookie_token": "t", "account_id": 1});

    let cases = [
        (Method::GET, "/api/accounts", None),
        (Method::GET, "/api/accounts/1", None),
        (Method::POST, "/api/accounts", Some(payload.clone())),
        (Method::PUT, "/api/accounts/1", Some(json!({"name": "B"}))),
        (Method::DELETE, "/api/accounts/1", None),
        (Method::GET, "/api/accounts/1/extra", None),
    ];
    for (method, uri, body) in cases {
        let (status, resp) = app.send(method.clone(), uri, None, body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(resp["success"], false);
        assert_eq!(resp["message"], "Unauthorized");

        let (status, _) = app.send(method.clone(), uri, Some("wrong"), body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    assert!(app.storage.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unauthorized_response_advertises_bearer_scheme() {
    let app = spawn_app(Some(SECRET)).await;

    let request = Request::builder()
        .uri("/api/accounts")
        .header(header::AUTHORIZATION, format!("Basic {SECRET}"))
        .body(Body::empty())
        .unwrap();
    let resp = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()[header::WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn missing_secret_fails_closed() {
    let app = spawn_app(None).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/accounts",
            Some("anything"),
            Some(json!({"name": "A", "cookie_token": "t", "account_id": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Server configuration error");
    assert!(app.storage.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn auth_runs_before_body_validation() {
    let app = spawn_app(Some(SECRET)).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/accounts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let (status, _) = app.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn status_route_is_public() {
    let app = spawn_app(None).await;

    let (status, body) = app.send(Method::GET, "/api", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "API is running."}));
}

#[tokio::test]
async fn unknown_routes_and_methods_keep_the_envelope() {
    let app = spawn_app(Some(SECRET)).await;

    let (status, body) = app.send(Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route not found");

    let (status, body) = app.send(Method::POST, "/api", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "Method not allowed");

    let (status, body) = app.authed(Method::PATCH, "/api/accounts/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
}
