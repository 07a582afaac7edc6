//! API error type
//!
//! Every failure surfaced by the HTTP client or the mock backend is an [`ApiError`].
//! Server messages are pulled from the response body in a fixed order:
//! `detail` (string, list of field errors, or object of field errors), then `message`,
//! then `error.message`, and only then the transport error text.

use serde_json::Value;

use crate::config::ConfigError;

/// Errors surfaced by API calls
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// No response was received (connection failure, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with an error status
    #[error("Request failed with status {status}: {message}")]
    Http {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    /// The client configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// A successful response did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::http(401, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(404, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::http(409, message)
    }

    /// Build an error from a failed response body
    pub fn from_response(status: u16, body: &Value, fallback: &str) -> Self {
        let message = message_from_body(body).unwrap_or_else(|| fallback.to_string());
        let details = match body {
            Value::Null | Value::String(_) => None,
            other => Some(other.clone()),
        };
        Self::Http {
            status,
            message,
            details,
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.status(), Some(400) | Some(422))
    }

    /// Single readable message for display
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(message) => format!("Network error: {}", message),
            ApiError::Config(message) => format!("Configuration error: {}", message),
            ApiError::Decode(message) => format!("Unexpected response: {}", message),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Config(err.to_string())
        } else if err.is_timeout() {
            ApiError::Network(format!("request timed out: {}", err))
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Extract a human-readable message from an error body
pub fn message_from_body(body: &Value) -> Option<String> {
    let candidates = [
        body.get("detail"),
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(flatten_message)
        .find(|m| !m.is_empty())
        .or_else(|| match body {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        })
}

/// Flatten a message that may be a string, a list of field errors or a map of them
pub fn flatten_message(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(flatten_field_error).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        Value::Object(map) => {
            if let Some(text) = map.get("msg").or_else(|| map.get("message")) {
                return flatten_field_error(&Value::Object(map.clone())).or_else(|| flatten_message(text));
            }
            let parts: Vec<String> = map
                .iter()
                .filter_map(|(field, value)| {
                    flatten_message(value).map(|message| format!("{}: {}", field, message))
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

/// One entry of a validation error list, e.g. `{"loc": ["body", "email"], "msg": "..."}`
fn flatten_field_error(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let message = map
                .get("msg")
                .or_else(|| map.get("message"))
                .and_then(Value::as_str)?;
            let field = map
                .get("loc")
                .and_then(Value::as_array)
                .and_then(|loc| {
                    loc.iter()
                        .rev()
                        .find(|part| part.as_str() != Some("body"))
                        .map(|part| match part {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                })
                .or_else(|| map.get("field").and_then(Value::as_str).map(str::to_string));
            Some(match field {
                Some(field) => format!("{}: {}", field, message),
                None => message.to_string(),
            })
        }
        other => flatten_message(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_wins_over_message() {
        let body = json!({"detail": "Token expired", "message": "ignored"});
        assert_eq!(message_from_body(&body).as_deref(), Some("Token expired"));
    }

    #[test]
    fn test_message_fallback_order() {
        assert_eq!(
            message_from_body(&json!({"message": "Email already registered"})).as_deref(),
            Some("Email already registered")
        );
        assert_eq!(
            message_from_body(&json!({"error": {"code": "NOT_FOUND", "message": "Role not found"}}))
                .as_deref(),
            Some("Role not found")
        );
        assert_eq!(message_from_body(&json!({"status": "nope"})), None);
        assert_eq!(message_from_body(&json!("Bad Gateway")).as_deref(), Some("Bad Gateway"));
    }

    #[test]
    fn test_validation_list_is_flattened() {
        let body = json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"},
                {"loc": ["body", "password"], "msg": "ensure this value has at least 6 characters"}
            ]
        });
        assert_eq!(
            message_from_body(&body).as_deref(),
            Some("email: value is not a valid email address; password: ensure this value has at least 6 characters")
        );
    }

    #[test]
    fn test_validation_object_is_flattened() {
        let body = json!({"detail": {"email": "taken", "name": ["too short", "invalid"]}});
        let message = message_from_body(&body).unwrap();
        assert!(message.contains("email: taken"));
        assert!(message.contains("name: too short; invalid"));
        assert!(!message.contains('{'));
    }

    #[test]
    fn test_from_response_uses_fallback() {
        let err = ApiError::from_response(502, &Value::Null, "Bad Gateway");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_status_predicates() {
        assert!(ApiError::unauthorized("x").is_unauthorized());
        assert!(ApiError::not_found("x").is_not_found());
        assert!(ApiError::http(422, "x").is_validation());
        assert!(!ApiError::Network("down".to_string()).is_unauthorized());
        assert_eq!(ApiError::Network("down".to_string()).status(), None);
    }
}
