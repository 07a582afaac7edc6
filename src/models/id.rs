//! Record identifiers
//!
//! The REST backend emits prefixed string ids (`USR-3`, `ROLE-1`, `LOG-42`) while the
//! mock fixtures use plain numbers. `RecordId` accepts both and compares them by their
//! numeric part when one exists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a user, role or log entry
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    /// Numeric part: the number itself, or the digits after the last `-` of a prefixed id
    pub fn numeric(&self) -> Option<i64> {
        match self {
            RecordId::Number(n) => Some(*n),
            RecordId::Text(text) => {
                let digits = text.rsplit('-').next().unwrap_or(text);
                digits.trim().parse().ok()
            }
        }
    }

    /// Whether both ids name the same record
    pub fn matches(&self, other: &RecordId) -> bool {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    /// Form suitable for a URL path segment
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.to_string()).into_owned()
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Number(0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| RecordId::Text(value.to_string()))
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::from(value.as_str())
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    /// Plain integers become `Number`, anything else stays text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}
