//! Response envelope
//!
//! Some backend routes wrap their payload as `{"success": true, "data": ..., "message": ...}`,
//! others return the payload bare. Both are decoded here, once, so API modules only ever
//! see the payload type.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keys allowed next to `data` in a wrapped response
const ENVELOPE_KEYS: [&str; 6] = ["data", "success", "message", "code", "error_code", "timestamp"];

const FAILED_MESSAGE: &str = "Request failed";

/// A decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    /// `{success?, data, message?}`
    Wrapped {
        success: Option<bool>,
        data: T,
        message: Option<String>,
    },
    /// The payload itself
    Bare(T),
    /// A wrapped response reporting `success: false`; its `data` is not decoded
    Failed { message: Option<String> },
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decode a JSON body
    ///
    /// An object is treated as wrapped only when it has a `data` key and every other key
    /// is an envelope key, so payloads that merely contain a `data` field stay bare.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if let Value::Object(map) = value {
            if is_wrapped(&map) {
                let mut map = map;
                let success = map.get("success").and_then(Value::as_bool);
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                if success == Some(false) {
                    return Ok(Envelope::Failed { message });
                }
                let data = map.remove("data").unwrap_or(Value::Null);
                return Ok(Envelope::Wrapped {
                    success,
                    data: serde_json::from_value(data)?,
                    message,
                });
            }
            return Ok(Envelope::Bare(serde_json::from_value(Value::Object(map))?));
        }
        Ok(Envelope::Bare(serde_json::from_value(value)?))
    }
}

impl<T> Envelope<T> {
    /// The payload, whichever shape carried it, or the failure message
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Wrapped { data, .. } => Ok(data),
            Envelope::Bare(data) => Ok(data),
            Envelope::Failed { message } => {
                Err(message.unwrap_or_else(|| FAILED_MESSAGE.to_string()))
            }
        }
    }

    /// Message carried by a wrapped response reporting `success: false`
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Envelope::Failed { message } => Some(message.as_deref().unwrap_or(FAILED_MESSAGE)),
            _ => None,
        }
    }
}

fn is_wrapped(map: &Map<String, Value>) -> bool {
    map.contains_key("data") && map.keys().all(|key| ENVELOPE_KEYS.contains(&key.as_str()))
}
