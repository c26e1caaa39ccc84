//! End-to-end tests for the login, logout, and refresh flows.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::{ADMIN_PASSWORD, DISPATCHER_ID, DISPATCHER_PASSWORD, TestApp};

#[tokio::test]
async fn test_login_returns_tokens_and_account() {
    let app = TestApp::new().await;

    let response = app
        .login_from("alice", DISPATCHER_PASSWORD, "1.2.3.4")
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let data = &response.body["data"];
    assert!(data["access_token"].is_string());
    assert!(data["refresh_token"].is_string());
    assert!(data["expires_in_seconds"].as_i64().unwrap() > 0);
    assert_eq!(data["account"]["username"], "alice");
    assert_eq!(data["account"]["roles"], json!(["dispatcher"]));

    // The session pointer now records this login.
    let pointer = app.directory.stored_session(DISPATCHER_ID).unwrap();
    assert_eq!(pointer.origin, "1.2.3.4");
    assert_eq!(pointer.token, data["access_token"].as_str().unwrap());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;

    let response = app.login_from("alice", "wrong-password", "1.2.3.4").await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_unknown_username_indistinguishable_from_bad_password() {
    let app = TestApp::new().await;

    let unknown = app.login_from("mallory", "whatever", "1.2.3.4").await;
    let bad_password = app.login_from("alice", "whatever", "1.2.3.4").await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], bad_password.body["message"]);
}

#[tokio::test]
async fn test_login_inactive_account() {
    let app = TestApp::new().await;

    let response = app.login_from("bob", "bob-password", "1.2.3.4").await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_empty_credentials_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({"username": "", "password": ""})),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conflicting_login_returns_409_with_origin() {
    let app = TestApp::new().await;
    app.login_ok("alice", DISPATCHER_PASSWORD, "1.2.3.4").await;

    let response = app
        .login_from("alice", DISPATCHER_PASSWORD, "5.6.7.8")
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT, "{:?}", response.body);
    assert_eq!(response.body["error"], "SESSION_CONFLICT");
    assert_eq!(response.body["conflicting_origin"], "1.2.3.4");

    // The first session survives the refused attempt.
    let pointer = app.directory.stored_session(DISPATCHER_ID).unwrap();
    assert_eq!(pointer.origin, "1.2.3.4");
}

#[tokio::test]
async fn test_same_origin_relogin_succeeds() {
    let app = TestApp::new().await;
    app.login_ok("alice", DISPATCHER_PASSWORD, "1.2.3.4").await;

    let response = app
        .login_from("alice", DISPATCHER_PASSWORD, "1.2.3.4")
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_forced_login_evicts_prior_session() {
    let app = TestApp::new().await;
    let first_token = app.login_ok("alice", DISPATCHER_PASSWORD, "1.2.3.4").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login/force",
            Some(json!({"username": "alice", "password": DISPATCHER_PASSWORD})),
            &[("x-forwarded-for", "5.6.7.8")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let second_token = response.body["data"]["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    // The evicted token is dead; the new one works.
    let evicted = app
        .request_with_token("GET", "/api/auth/permissions", None, &first_token)
        .await;
    assert_eq!(evicted.status, StatusCode::UNAUTHORIZED);

    let fresh = app
        .request_with_token("GET", "/api/auth/permissions", None, &second_token)
        .await;
    assert_eq!(fresh.status, StatusCode::OK);

    let pointer = app.directory.stored_session(DISPATCHER_ID).unwrap();
    assert_eq!(pointer.origin, "5.6.7.8");
}

#[tokio::test]
async fn test_logout_revokes_token_and_clears_session() {
    let app = TestApp::new().await;
    let token = app.login_ok("alice", DISPATCHER_PASSWORD, "1.2.3.4").await;

    let response = app
        .request_with_token("POST", "/api/auth/logout", None, &token)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    assert!(app.directory.stored_session(DISPATCHER_ID).is_none());

    // The revoked token is refused from then on.
    let after = app
        .request_with_token("GET", "/api/auth/permissions", None, &token)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_consumes() {
    let app = TestApp::new().await;
    let login = app.login_from("root", ADMIN_PASSWORD, "1.2.3.4").await;
    assert_eq!(login.status, StatusCode::OK);
    let refresh_token = login.body["data"]["refresh_token"]
        .as_str()
        .unwrap()
        .to_string();

    let rotated = app
        .request(
            "POST",
            "/api/auth/token/refresh",
            Some(json!({"refresh_token": refresh_token})),
            &[],
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK, "{:?}", rotated.body);
    let new_access = rotated.body["data"]["access_token"].as_str().unwrap();

    let check = app
        .request_with_token("GET", "/api/auth/permissions", None, new_access)
        .await;
    assert_eq!(check.status, StatusCode::OK);

    // The consumed refresh token cannot be replayed.
    let replay = app
        .request(
            "POST",
            "/api/auth/token/refresh",
            Some(json!({"refresh_token": refresh_token})),
            &[],
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new().await;
    let access = app.login_ok("alice", DISPATCHER_PASSWORD, "1.2.3.4").await;

    let response = app
        .request(
            "POST",
            "/api/auth/token/refresh",
            Some(json!({"refresh_token": access})),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/auth/permissions", None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token() {
    let app = TestApp::new().await;

    let response = app
        .request_with_token("GET", "/api/auth/permissions", None, "not-a-token")
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
