//! End-to-end tests for the signed driver surface.

mod helpers;

use axum::http::StatusCode;
use chrono::Utc;

use helpers::{DRIVER_ID, TestApp, client_sign};

#[tokio::test]
async fn test_signed_get_profile() {
    let app = TestApp::new().await;

    let response = app
        .signed_get("/api/driver/profile", app.driver_params("nonce-profile-1"))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["id"], DRIVER_ID);
    assert_eq!(response.body["data"]["username"], "dax");
}

#[tokio::test]
async fn test_signed_post_location() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-location-1");
    params.insert("lat".to_string(), "52.3702".to_string());
    params.insert("lng".to_string(), "4.8952".to_string());

    let response = app.signed_post("/api/driver/location", params).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["message"], "Location recorded");
}

#[tokio::test]
async fn test_replayed_request_rejected() {
    let app = TestApp::new().await;
    let params = app.driver_params("nonce-replay-1");

    let first = app.signed_get("/api/driver/profile", params.clone()).await;
    assert_eq!(first.status, StatusCode::OK);

    // Byte-identical resend of an accepted request.
    let second = app.signed_get("/api/driver/profile", params).await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.body["message"], "replay");
}

#[tokio::test]
async fn test_stale_timestamp_rejected() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-stale-1");
    params.insert(
        "timestamp".to_string(),
        (Utc::now().timestamp() - 600).to_string(),
    );

    let response = app.signed_get("/api/driver/profile", params).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "expired");
}

#[tokio::test]
async fn test_future_timestamp_rejected() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-future-1");
    params.insert(
        "timestamp".to_string(),
        (Utc::now().timestamp() + 600).to_string(),
    );

    let response = app.signed_get("/api/driver/profile", params).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "expired");
}

#[tokio::test]
async fn test_extreme_timestamp_rejected() {
    let app = TestApp::new().await;

    // A timestamp at the i64 extremes must land in the expired path,
    // not abort the request.
    for extreme in [i64::MIN, i64::MAX] {
        let mut params = app.driver_params("nonce-extreme-1");
        params.insert("timestamp".to_string(), extreme.to_string());

        let response = app.signed_get("/api/driver/profile", params).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "expired");
    }
}

#[tokio::test]
async fn test_short_nonce_rejected() {
    let app = TestApp::new().await;

    let response = app
        .signed_get("/api/driver/profile", app.driver_params("tiny"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "nonce too short");
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let app = TestApp::new().await;

    // Signed-surface parameters without any signature at all.
    let params = app.driver_params("nonce-missing-1");
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    let uri = format!("/api/driver/profile?{}", query.join("&"));
    let response = app.request("GET", &uri, None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "missing parameters");
}

#[tokio::test]
async fn test_tampered_parameter_rejected() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-tamper-1");
    params.insert("lat".to_string(), "52.3702".to_string());
    params.insert("lng".to_string(), "4.8952".to_string());
    let mut signed = app.with_signature(params);

    // Altered after signing.
    signed.insert("lat".to_string(), "0.0".to_string());

    let body = serde_json::to_value(&signed).unwrap();
    let response = app.request("POST", "/api/driver/location", Some(body), &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "signature mismatch");
}

#[tokio::test]
async fn test_signature_from_wrong_account_key_rejected() {
    let app = TestApp::new().await;

    // Signed with account 2's derived key but claiming to be the driver.
    let mut params = app.driver_params("nonce-wrongkey-1");
    let forged = client_sign(&app.config.signature.base_secret, 2, &params);
    params.insert("signature".to_string(), forged);

    let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    let uri = format!("/api/driver/profile?{}", query.join("&"));
    let response = app.request("GET", &uri, None, &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "signature mismatch");
}

#[tokio::test]
async fn test_failed_signature_does_not_consume_nonce() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-keep-1");
    params.insert("lat".to_string(), "52.0".to_string());
    params.insert("lng".to_string(), "4.0".to_string());
    let mut tampered = app.with_signature(params.clone());
    tampered.insert("lat".to_string(), "0.0".to_string());

    let body = serde_json::to_value(&tampered).unwrap();
    let forged = app.request("POST", "/api/driver/location", Some(body), &[]).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    // The honest client can still use its nonce.
    let honest = app.signed_post("/api/driver/location", params).await;
    assert_eq!(honest.status, StatusCode::OK, "{:?}", honest.body);
}

#[tokio::test]
async fn test_numeric_coordinates_accepted() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-numeric-1");
    params.insert("lat".to_string(), "52.37".to_string());
    params.insert("lng".to_string(), "4.89".to_string());
    let signed = app.with_signature(params);

    // Same request, but lat/lng sent as JSON numbers the way older
    // client builds do.
    let mut body = serde_json::Map::new();
    for (k, v) in &signed {
        if k == "lat" || k == "lng" {
            body.insert(k.clone(), serde_json::json!(v.parse::<f64>().unwrap()));
        } else {
            body.insert(k.clone(), serde_json::json!(v));
        }
    }

    let response = app
        .request(
            "POST",
            "/api/driver/location",
            Some(serde_json::Value::Object(body)),
            &[],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["message"], "Location recorded");
}

#[tokio::test]
async fn test_signature_params_accepted_from_headers() {
    let app = TestApp::new().await;

    let mut params = app.driver_params("nonce-header-1");
    params.insert("lat".to_string(), "52.3702".to_string());
    params.insert("lng".to_string(), "4.8952".to_string());
    let signed = app.with_signature(params);

    // timestamp/nonce/signature travel as headers; the rest as body.
    let timestamp = signed["timestamp"].clone();
    let nonce = signed["nonce"].clone();
    let signature = signed["signature"].clone();
    let body = serde_json::json!({
        "account_id": signed["account_id"],
        "lat": signed["lat"],
        "lng": signed["lng"],
    });

    let response = app
        .request(
            "POST",
            "/api/driver/location",
            Some(body),
            &[
                ("x-timestamp", timestamp.as_str()),
                ("x-nonce", nonce.as_str()),
                ("x-signature", signature.as_str()),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_bearer_token_does_not_open_driver_surface() {
    let app = TestApp::new().await;
    let token = app
        .login_ok("alice", helpers::DISPATCHER_PASSWORD, "1.2.3.4")
        .await;

    let response = app
        .request_with_token("GET", "/api/driver/profile", None, &token)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
