//! Response envelope handling
//!
//! The gateway answers with `{ success, data }` envelopes on some endpoints
//! and bare objects or arrays on others. Lists may be nested under `data`,
//! `items` or a plural key. Everything here is pure so it can be tested
//! without a live gateway.

use serde_json::Value;

use super::GatewayError;

const MESSAGE_KEYS: &[&str] = &["message", "error", "errors", "details", "msg"];

const LIST_KEYS: &[&str] = &["items", "results", "rows", "records", "data"];

/// Map an HTTP status and decoded body to a payload or a gateway error.
///
/// A 404 on a read means the resource is missing; on a mutation it means
/// the gateway does not serve that operation yet.
pub fn classify(status: u16, is_read: bool, path: &str, body: Value) -> Result<Value, GatewayError> {
    match status {
        200..=299 => unwrap_envelope(status, body),
        401 | 403 => Err(GatewayError::Unauthorized(
            extract_messages(&body)
                .into_iter()
                .next()
                .unwrap_or_else(|| "access denied".to_string()),
        )),
        404 if is_read => Err(GatewayError::NotFound(path.to_string())),
        404 => Err(GatewayError::NotDeployed(path.to_string())),
        400..=499 => Err(GatewayError::Validation {
            status,
            messages: non_empty_messages(&body),
        }),
        _ => Err(GatewayError::Upstream {
            status,
            message: extract_messages(&body).join("; "),
        }),
    }
}

/// Strip a `{ success, data }` envelope. `success: false` on a 2xx is a
/// rejection even though the status says otherwise.
pub fn unwrap_envelope(status: u16, body: Value) -> Result<Value, GatewayError> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    if let Some(Value::Bool(false)) = map.get("success") {
        return Err(GatewayError::Validation {
            status,
            messages: non_empty_messages(&Value::Object(map)),
        });
    }

    match map.remove("data") {
        Some(data) => Ok(data),
        None => Ok(Value::Object(map)),
    }
}

/// Pull a list out of whatever shape the gateway used. `plural` is the
/// entity key some endpoints nest under (`properties`, `investments`, ...).
pub fn extract_list(value: Value, plural: &str) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let nested = std::iter::once(plural)
                .chain(LIST_KEYS.iter().copied())
                .find_map(|key| map.remove(key).filter(|v| v.is_array() || v.is_object()));
            match nested {
                Some(Value::Array(items)) => items,
                Some(inner @ Value::Object(_)) => extract_list(inner, plural),
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

/// Pull a single record out of `{ <singular>: {...} }` if nested that way.
pub fn extract_record(value: Value, singular: &str) -> Value {
    match value {
        Value::Object(mut map) if map.get(singular).is_some_and(Value::is_object) => {
            map.remove(singular).unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Collect human-readable messages from a string, a list, or a field map.
pub fn extract_messages(body: &Value) -> Vec<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Value::Object(map) => MESSAGE_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .flat_map(messages_from_value)
            .collect(),
        _ => Vec::new(),
    }
}

fn messages_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(obj) => {
                    let text = ["message", "msg"]
                        .iter()
                        .find_map(|k| obj.get(*k).and_then(Value::as_str));
                    let field = ["field", "path", "param"]
                        .iter()
                        .find_map(|k| obj.get(*k).and_then(Value::as_str));
                    match (field, text) {
                        (Some(f), Some(t)) => vec![format!("{}: {}", f, t)],
                        (None, Some(t)) => vec![t.to_string()],
                        _ => Vec::new(),
                    }
                }
                other => messages_from_value(other),
            })
            .collect(),
        Value::Object(fields) => fields
            .iter()
            .flat_map(|(field, errors)| {
                messages_from_value(errors)
                    .into_iter()
                    .map(move |msg| format!("{}: {}", field, msg))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty_messages(body: &Value) -> Vec<String> {
    let messages = extract_messages(body);
    if messages.is_empty() {
        vec!["Request rejected".to_string()]
    } else {
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_success_envelope() {
        let body = json!({ "success": true, "data": { "id": "p-1" } });
        assert_eq!(classify(200, true, "/p", body).unwrap(), json!({ "id": "p-1" }));
    }

    #[test]
    fn test_bare_payload_passes_through() {
        let body = json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(classify(200, true, "/p", body.clone()).unwrap(), body);
    }

    #[test]
    fn test_success_false_on_2xx_is_rejection() {
        let body = json!({ "success": false, "message": "Insufficient balance" });
        assert_eq!(
            classify(200, false, "/w", body),
            Err(GatewayError::Validation {
                status: 200,
                messages: vec!["Insufficient balance".to_string()]
            })
        );
    }

    #[test]
    fn test_404_read_vs_mutation() {
        assert_eq!(
            classify(404, true, "/properties/9", Value::Null),
            Err(GatewayError::NotFound("/properties/9".to_string()))
        );
        assert_eq!(
            classify(404, false, "/properties/9/status", Value::Null),
            Err(GatewayError::NotDeployed("/properties/9/status".to_string()))
        );
    }

    #[test]
    fn test_field_errors_are_itemized() {
        let body = json!({
            "message": "Validation failed",
            "errors": { "amount": ["must be positive"], "email": "is invalid" }
        });
        let Err(GatewayError::Validation { status, messages }) = classify(422, false, "/x", body)
        else {
            panic!("expected validation error");
        };
        assert_eq!(status, 422);
        assert_eq!(
            messages,
            vec![
                "Validation failed".to_string(),
                "amount: must be positive".to_string(),
                "email: is invalid".to_string(),
            ]
        );
    }

    #[test]
    fn test_error_list_with_objects() {
        let body = json!({ "errors": [{ "param": "title", "msg": "required" }, "bad request"] });
        assert_eq!(
            extract_messages(&body),
            vec!["title: required".to_string(), "bad request".to_string()]
        );
    }

    #[test]
    fn test_validation_without_message_gets_default() {
        let Err(GatewayError::Validation { messages, .. }) = classify(400, false, "/x", json!({}))
        else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["Request rejected".to_string()]);
    }

    #[test]
    fn test_server_error_is_retryable() {
        let err = classify(503, true, "/x", json!({ "error": "maintenance" })).unwrap_err();
        assert!(err.is_retryable());
        assert!(!GatewayError::NotFound("/x".to_string()).is_retryable());
    }

    #[test]
    fn test_extract_list_shapes() {
        assert_eq!(extract_list(json!([1, 2]), "properties").len(), 2);
        assert_eq!(
            extract_list(json!({ "properties": [1, 2, 3] }), "properties").len(),
            3
        );
        assert_eq!(
            extract_list(json!({ "items": [1], "total": 1 }), "properties").len(),
            1
        );
        assert_eq!(
            extract_list(json!({ "data": { "investments": [1, 2] } }), "investments").len(),
            2
        );
        assert!(extract_list(json!({ "total": 0 }), "properties").is_empty());
        assert!(extract_list(Value::Null, "properties").is_empty());
    }

    #[test]
    fn test_extract_record() {
        let nested = json!({ "property": { "id": "p-1" }, "meta": {} });
        assert_eq!(extract_record(nested, "property"), json!({ "id": "p-1" }));
        let flat = json!({ "id": "p-2" });
        assert_eq!(extract_record(flat.clone(), "property"), flat);
    }
}
