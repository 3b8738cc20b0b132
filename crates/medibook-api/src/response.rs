//! Uniform response envelope.
//!
//! Every endpoint answers `{success, message?, ...payload}` with HTTP
//! 200, failures included; status codes are not used to signal errors.

use axum::Json;
use serde_json::{json, Map, Value};

/// `{success: true, ...payload}`. `payload` must serialize to a JSON
/// object; its keys are merged into the envelope.
pub fn ok(payload: Value) -> Json<Value> {
    let mut body = match payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("payload".to_owned(), other);
            map
        }
    };
    body.insert("success".to_owned(), Value::Bool(true));
    Json(Value::Object(body))
}

/// `{success: false, message}`.
pub fn failure(message: impl AsRef<str>) -> Json<Value> {
    Json(json!({ "success": false, "message": message.as_ref() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_merges_payload_keys() {
        let Json(body) = ok(json!({ "token": "abc" }));
        assert_eq!(body["success"], true);
        assert_eq!(body["token"], "abc");
    }

    #[test]
    fn test_failure_shape() {
        let Json(body) = failure("Slot not available");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Slot not available");
    }
}
