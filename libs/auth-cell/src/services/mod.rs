pub mod account;
pub mod oauth;

use serde_json::Value;

/// Find the session token in a backend auth response. Deployments differ on
/// the key and on whether the payload is enveloped, so a few spellings are
/// accepted, top-level first and then under `data`.
pub(crate) fn extract_token(value: &Value) -> Option<String> {
    const KEYS: &[&str] = &["token", "access_token", "jwt"];

    for key in KEYS {
        if let Some(token) = value.get(key).and_then(Value::as_str) {
            return Some(token.to_string());
        }
    }

    let data = value.get("data")?;
    for key in KEYS {
        if let Some(token) = data.get(key).and_then(Value::as_str) {
            return Some(token.to_string());
        }
    }

    None
}
