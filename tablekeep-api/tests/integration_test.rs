/// Integration tests for the Tablekeep API
///
/// These tests drive the full router in-process and verify the boundary
/// behavior that does not require a live database:
/// - Every protected route rejects unauthenticated requests with 401
/// - Malformed credentials are rejected before any database lookup
/// - Request validation produces itemized 422 responses
/// - The health endpoint degrades gracefully when the database is down
/// - Security headers are present on every response

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use tower::Service as _;

/// Every protected route must reject a request with no credentials
#[tokio::test]
async fn test_protected_routes_require_authentication() {
    let ctx = TestContext::new();

    let protected = vec![
        ("POST", "/logout"),
        ("GET", "/me"),
        ("GET", "/reservations"),
        ("POST", "/reservations"),
        ("GET", "/reservations/1c0e3a34-98a1-4f7c-b1a4-92f5a1f3b111"),
        ("PUT", "/reservations/1c0e3a34-98a1-4f7c-b1a4-92f5a1f3b111"),
        ("PATCH", "/reservations/1c0e3a34-98a1-4f7c-b1a4-92f5a1f3b111"),
        ("DELETE", "/reservations/1c0e3a34-98a1-4f7c-b1a4-92f5a1f3b111"),
    ];

    for (method, uri) in protected {
        let response = ctx
            .app
            .clone()
            .call(common::bare_request(method, uri))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require authentication",
            method,
            uri
        );
    }
}

/// A non-Bearer Authorization scheme is rejected as unauthenticated
#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::authed_request("GET", "/me", "Basic dXNlcjpwYXNz"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "unauthenticated");
}

/// A malformed token is rejected by the format check, before any lookup
#[tokio::test]
async fn test_malformed_token_rejected() {
    let ctx = TestContext::new();

    let malformed = vec![
        "Bearer garbage",
        "Bearer tbk_tooshort",
        // correct length, illegal characters
        "Bearer tbk_!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!",
    ];

    for authorization in malformed {
        let response = ctx
            .app
            .clone()
            .call(common::authed_request("GET", "/reservations", authorization))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "'{}' should be rejected",
            authorization
        );

        let body = common::body_json(response).await;
        assert_eq!(body["error"], "unauthenticated");
    }
}

/// Registration with a syntactically invalid email is a 422 itemized on the field
#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::json_request(
            "POST",
            "/register",
            json!({
                "name": "Alice",
                "email": "not-an-email",
                "password": "secret1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "validation_error");

    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "email"));
}

/// Registration with a too-short password is a 422 itemized on the field
#[tokio::test]
async fn test_register_rejects_short_password() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::json_request(
            "POST",
            "/register",
            json!({
                "name": "Alice",
                "email": "alice@x.com",
                "password": "short"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "password"));
}

/// Registration with an empty name is a 422 itemized on the field
#[tokio::test]
async fn test_register_rejects_empty_name() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::json_request(
            "POST",
            "/register",
            json!({
                "name": "",
                "email": "alice@x.com",
                "password": "secret1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["field"] == "name"));
}

/// Multiple invalid fields are all itemized in a single response
#[tokio::test]
async fn test_register_itemizes_every_invalid_field() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::json_request(
            "POST",
            "/register",
            json!({
                "name": "",
                "email": "nope",
                "password": "x"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(response).await;
    let details = body["details"].as_array().unwrap();

    for field in ["name", "email", "password"] {
        assert!(
            details.iter().any(|d| d["field"] == field),
            "expected a validation error for '{}'",
            field
        );
    }
}

/// Login validates the email shape before touching credentials
#[tokio::test]
async fn test_login_rejects_invalid_email_shape() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::json_request(
            "POST",
            "/login",
            json!({
                "email": "not-an-email",
                "password": "whatever"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

/// Health stays 200 but reports the database as down
#[tokio::test]
async fn test_health_degrades_without_database() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::bare_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
    assert!(body["version"].is_string());
}

/// Security headers are applied to every response
#[tokio::test]
async fn test_security_headers_on_responses() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(common::bare_request("GET", "/me"))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
}

/// Unknown routes fall through to 404
#[tokio::test]
async fn test_unknown_route_is_404() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("GET")
                .uri("/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
