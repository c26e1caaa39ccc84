//! Signed-request verification for the driver surface.
//!
//! Driver endpoints carry no bearer token. This middleware merges the
//! query string, JSON body, and `X-Timestamp`/`X-Nonce`/`X-Signature`
//! headers into one parameter set, verifies the HMAC signature, and
//! injects the verified driver identity for the handler.

use std::collections::HashMap;

use axum::body::{Body, to_bytes};
use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::{Map, Value};

use fleetdesk_core::error::AppError;

use crate::state::AppState;

/// Signed requests are parameter-sized; anything larger is rejected
/// before signature work.
const MAX_SIGNED_BODY_BYTES: usize = 256 * 1024;

/// Header-to-parameter aliases accepted on the signed surface.
const HEADER_PARAMS: [(&str, &str); 3] = [
    ("x-timestamp", "timestamp"),
    ("x-nonce", "nonce"),
    ("x-signature", "signature"),
];

/// The driver account a request was verified for.
#[derive(Debug, Clone, Copy)]
pub struct DriverIdentity {
    /// Verified account ID.
    pub account_id: i64,
}

/// Verifies the request signature and forwards on success.
pub async fn verify_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = request.into_parts();

    let bytes = to_bytes(body, MAX_SIGNED_BODY_BYTES)
        .await
        .map_err(|e| AppError::validation(format!("Failed to read request body: {e}")))?;

    let mut params = Map::new();

    if let Ok(Query(query)) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
        for (key, value) in query {
            params.insert(key, Value::String(value));
        }
    }

    if !bytes.is_empty() {
        let parsed: Value = serde_json::from_slice(&bytes)
            .map_err(|_| AppError::validation("Signed requests must carry a JSON body"))?;
        match parsed {
            Value::Object(map) => params.extend(map),
            _ => {
                return Err(AppError::validation(
                    "Signed request body must be a JSON object",
                ));
            }
        }
    }

    for (header, param) in HEADER_PARAMS {
        if let Some(value) = parts.headers.get(header).and_then(|v| v.to_str().ok()) {
            params.insert(param.to_string(), Value::String(value.to_string()));
        }
    }

    let account_id = param_account_id(&params)
        .ok_or_else(|| AppError::unauthorized("missing parameters"))?;

    state
        .signature_verifier
        .verify(account_id, &params)
        .map_err(|rejection| AppError::unauthorized(rejection.reason()))?;

    parts.extensions.insert(DriverIdentity { account_id });

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

fn param_account_id(params: &Map<String, Value>) -> Option<i64> {
    match params.get("account_id")? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
