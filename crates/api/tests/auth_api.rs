//! HTTP-level integration tests for authentication and the `/auth` routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, post_json_auth};
use estoque_core::roles::Role;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with a token and the user snapshot.
#[tokio::test]
async fn test_login_success() {
    let app = common::build_test_app();
    let user = common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;

    let body = serde_json::json!({ "username": "maria", "password": common::TEST_PASSWORD });
    let response = post_json(app.router.clone(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string(), "response must contain a token");
    assert_eq!(json["data"]["user"]["id"], user.id);
    assert_eq!(json["data"]["user"]["username"], "maria");
    assert_eq!(json["data"]["user"]["role"], "user");
    assert!(
        json["data"]["user"]["password_hash"].is_null(),
        "password hash must never leave the server"
    );
}

/// Login with an incorrect password returns 401.
#[tokio::test]
async fn test_login_wrong_password() {
    let app = common::build_test_app();
    common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;

    let body = serde_json::json!({ "username": "maria", "password": "incorrect_password" });
    let response = post_json(app.router.clone(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login failures do not reveal whether the username exists: unknown user
/// and wrong password return the same message.
#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = common::build_test_app();
    common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;

    let wrong_pw = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "maria", "password": "nope" }),
    )
    .await;
    let no_user = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "ghost", "password": "nope" }),
    )
    .await;

    assert_eq!(wrong_pw.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(no_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(wrong_pw).await["error"],
        body_json(no_user).await["error"]
    );
}

// ---------------------------------------------------------------------------
// Token enforcement
// ---------------------------------------------------------------------------

/// Protected routes return 401 without a token.
#[tokio::test]
async fn test_missing_token_rejected() {
    let app = common::build_test_app();
    let response = common::get(app.router, "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A garbage token is rejected.
#[tokio::test]
async fn test_invalid_token_rejected() {
    let app = common::build_test_app();
    let response = get_auth(app.router, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// GET /auth/me returns the authenticated user.
#[tokio::test]
async fn test_me_returns_current_user() {
    let app = common::build_test_app();
    let user = common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;
    let token = common::login(&app, "maria").await;

    let response = get_auth(app.router.clone(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["username"], "maria");
}

// ---------------------------------------------------------------------------
// Change password
// ---------------------------------------------------------------------------

/// Changing the password invalidates the old one and accepts the new one.
#[tokio::test]
async fn test_change_password_flow() {
    let app = common::build_test_app();
    common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;
    let token = common::login(&app, "maria").await;

    let body = serde_json::json!({
        "current_password": common::TEST_PASSWORD,
        "new_password": "brand_new_password_9",
    });
    let response =
        post_json_auth(app.router.clone(), "/api/v1/auth/change-password", &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works.
    let old = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "maria", "password": common::TEST_PASSWORD }),
    )
    .await;
    assert_eq!(old.status(), StatusCode::UNAUTHORIZED);

    // New password does.
    let new = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "username": "maria", "password": "brand_new_password_9" }),
    )
    .await;
    assert_eq!(new.status(), StatusCode::OK);
}

/// A wrong current password is rejected with 401.
#[tokio::test]
async fn test_change_password_wrong_current() {
    let app = common::build_test_app();
    common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;
    let token = common::login(&app, "maria").await;

    let body = serde_json::json!({
        "current_password": "not_the_password",
        "new_password": "brand_new_password_9",
    });
    let response =
        post_json_auth(app.router.clone(), "/api/v1/auth/change-password", &token, body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A new password below the minimum length fails validation.
#[tokio::test]
async fn test_change_password_too_short() {
    let app = common::build_test_app();
    common::seed_user(app.store.as_ref(), "maria", Role::User, Vec::new()).await;
    let token = common::login(&app, "maria").await;

    let body = serde_json::json!({
        "current_password": common::TEST_PASSWORD,
        "new_password": "short",
    });
    let response =
        post_json_auth(app.router.clone(), "/api/v1/auth/change-password", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
