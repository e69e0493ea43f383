//! API response envelopes
//!
//! The backend is not consistent about list envelopes: depending on the
//! route a collection arrives as `{ "data": [...] }`, `{ "results": [...] }`,
//! `{ "<moduleKey>": [...] }` or a bare array. Mutations report failure
//! either through the status code or through `{ "success": false }`.

use serde_json::Value;
use thiserror::Error;

/// Wrapper keys probed before the module key, in order
pub const LIST_ENVELOPE_KEYS: [&str; 2] = ["data", "results"];

/// The response body did not match any known collection shape
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("response body is empty")]
    Empty,
    #[error("no list found under data, results or {module_key} (keys: {keys})")]
    NoListEnvelope { module_key: String, keys: String },
    #[error("expected a list or an object, got {0}")]
    UnexpectedType(&'static str),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the item list from a collection response.
///
/// The first matching shape wins: `data`, then `results`, then the module
/// key, then a bare array.
pub fn normalize_list(body: &Value, module_key: &str) -> Result<Vec<Value>, ShapeError> {
    match body {
        Value::Array(items) => Ok(items.clone()),
        Value::Object(obj) => {
            let found = LIST_ENVELOPE_KEYS
                .iter()
                .copied()
                .chain(std::iter::once(module_key))
                .find_map(|key| obj.get(key).and_then(Value::as_array));
            match found {
                Some(items) => Ok(items.clone()),
                None => Err(ShapeError::NoListEnvelope {
                    module_key: module_key.to_string(),
                    keys: obj.keys().cloned().collect::<Vec<_>>().join(", "),
                }),
            }
        }
        Value::Null => Err(ShapeError::Empty),
        other => Err(ShapeError::UnexpectedType(type_name(other))),
    }
}

/// Human-readable message from an error body (`message`, then `error`)
pub fn server_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// A 2xx body that still reports failure via `success: false`
pub fn reports_failure(body: &Value) -> bool {
    matches!(body.get("success"), Some(Value::Bool(false)))
}

/// Single record from a mutation/detail response: `data`, then the given
/// key, then the body itself when it is an object
pub fn single_item<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get("data")
        .filter(|v| v.is_object())
        .or_else(|| body.get(key).filter(|v| v.is_object()))
        .or_else(|| body.is_object().then_some(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_envelope() {
        let body = json!({ "data": [{ "id": 1 }], "total": 1 });
        assert_eq!(normalize_list(&body, "rooms").unwrap(), vec![json!({ "id": 1 })]);
    }

    #[test]
    fn test_results_envelope() {
        let body = json!({ "results": [{ "id": 2 }, { "id": 3 }] });
        assert_eq!(normalize_list(&body, "menu").unwrap().len(), 2);
    }

    #[test]
    fn test_module_key_envelope() {
        let body = json!({ "rooms": [{ "roomId": "R1" }], "count": 1 });
        let items = normalize_list(&body, "rooms").unwrap();
        assert_eq!(items[0]["roomId"], "R1");
    }

    #[test]
    fn test_bare_array() {
        let body = json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(normalize_list(&body, "users").unwrap().len(), 2);
    }

    #[test]
    fn test_first_shape_wins() {
        let body = json!({ "results": [1], "data": [1, 2], "users": [1, 2, 3] });
        assert_eq!(normalize_list(&body, "users").unwrap().len(), 2);

        // a non-array `data` does not shadow later shapes
        let body = json!({ "data": { "page": 1 }, "users": [1, 2, 3] });
        assert_eq!(normalize_list(&body, "users").unwrap().len(), 3);
    }

    #[test]
    fn test_empty_list_is_ok() {
        assert!(normalize_list(&json!({ "data": [] }), "reviews").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_shapes() {
        assert_eq!(normalize_list(&Value::Null, "rooms"), Err(ShapeError::Empty));
        assert_eq!(
            normalize_list(&json!("<html>"), "rooms"),
            Err(ShapeError::UnexpectedType("string"))
        );
        let err = normalize_list(&json!({ "items": [] }), "rooms").unwrap_err();
        assert!(matches!(err, ShapeError::NoListEnvelope { ref module_key, .. } if module_key == "rooms"));
        assert!(err.to_string().contains("items"));
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(&json!({ "message": "Room exists" })).as_deref(),
            Some("Room exists")
        );
        assert_eq!(
            server_message(&json!({ "error": "Bad id" })).as_deref(),
            Some("Bad id")
        );
        assert_eq!(server_message(&json!({ "message": "  " })), None);
        assert_eq!(server_message(&Value::Null), None);
    }

    #[test]
    fn test_reports_failure() {
        assert!(reports_failure(&json!({ "success": false, "message": "nope" })));
        assert!(!reports_failure(&json!({ "success": true })));
        assert!(!reports_failure(&json!({ "id": 1 })));
    }

    #[test]
    fn test_single_item() {
        let body = json!({ "ok": true, "reservation": { "id": "r1" } });
        assert_eq!(single_item(&body, "reservation").unwrap()["id"], "r1");
        let body = json!({ "data": { "id": "d1" } });
        assert_eq!(single_item(&body, "reservation").unwrap()["id"], "d1");
        assert!(single_item(&json!([1]), "x").is_none());
    }
}
