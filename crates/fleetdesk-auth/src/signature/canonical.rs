//! Deterministic canonicalization of request parameters.
//!
//! The algorithm must be reproduced bit-for-bit by driver clients:
//! sort the keys, render each as `key=value`, join with `&`. The
//! `signature` field itself is always excluded.

use serde_json::{Map, Value};

/// Parameter name carrying the signature, excluded from canonicalization.
pub const SIGNATURE_FIELD: &str = "signature";

/// Canonicalizes a merged parameter set into the string to be signed.
///
/// Null values render as empty, scalars render bare, and object or
/// array values render as compact JSON.
pub fn canonicalize(params: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = params
        .keys()
        .filter(|k| k.as_str() != SIGNATURE_FIELD)
        .collect();
    keys.sort();

    keys.iter()
        .map(|k| format!("{k}={}", render_value(&params[k.as_str()])))
        .collect::<Vec<_>>()
        .join("&")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Objects and arrays are embedded as compact JSON.
        other => other.to_string(),
    }
}
