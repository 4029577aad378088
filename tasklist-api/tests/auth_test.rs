//! Integration tests for registration, login, and request authentication.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_register_returns_bearer_token() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let username = format!("user-{}", Uuid::new_v4());
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": username,
                "password": "testpass123",
                "first_name": "Ada",
                "last_name": "Lovelace",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let username = format!("user-{}", Uuid::new_v4());
    let request = json!({
        "username": username,
        "password": "testpass123",
        "first_name": "First",
    });

    let (status, _) = ctx
        .send("POST", "/v1/auth/register", None, Some(request.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx
        .send("POST", "/v1/auth/register", None, Some(request))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already registered");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": format!("user-{}", Uuid::new_v4()),
                "password": "short",
                "first_name": "Ada",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_returns_token() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (username, _) = ctx.register_user().await;

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "username": username,
                "password": "testpass123",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_failure_is_undifferentiated() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (username, _) = ctx.register_user().await;

    // Wrong password for an existing user
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "username": username,
                "password": "wrongpassword",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let wrong_password_message = body["message"].clone();

    // Unknown user entirely
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({
                "username": format!("nobody-{}", Uuid::new_v4()),
                "password": "testpass123",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Both failures read identically so responses do not reveal
    // whether the username exists
    assert_eq!(body["message"], wrong_password_message);
    assert_eq!(body["message"], "Invalid username or password");
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (status, _) = ctx.send("GET", "/v1/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected_as_unauthenticated() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    // Any request without a valid principal is 401, including a
    // well-formed header using the wrong scheme
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::Service::call(&mut ctx.app.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (status, _) = ctx
        .send("GET", "/v1/tasks", Some("not-a-valid-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_rejected() {
    let Some(ctx) = TestContext::try_new().await else {
        return;
    };

    let (username, token) = ctx.register_user().await;

    let user = tasklist_shared::models::user::User::find_by_username(&ctx.db, &username)
        .await
        .unwrap()
        .unwrap();
    tasklist_shared::models::user::User::delete(&ctx.db, user.id)
        .await
        .unwrap();

    let (status, _) = ctx.send("GET", "/v1/tasks", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
