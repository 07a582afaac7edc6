//! System log and settings models

use serde::{Deserialize, Serialize};

use super::RecordId;

/// Levels counted by the log summary
pub const SUMMARY_LEVELS: [&str; 4] = ["INFO", "WARN", "ERROR", "DEBUG"];

/// A single operation log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: RecordId,
    /// Timestamp as `YYYY-MM-DD HH:MM:SS`
    pub time: String,
    /// INFO, WARN, ERROR or DEBUG
    pub level: String,
    pub message: String,
    pub module: String,
    /// Free-form request context (`requestId`, `ip`, ...)
    #[serde(default)]
    pub context: serde_json::Value,
}

/// Count of log entries for one module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleCount {
    pub module: String,
    pub total: usize,
}

/// Aggregated view over the operation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSummary {
    /// Entry count per level
    pub severity: std::collections::BTreeMap<String, usize>,
    /// The five busiest modules, busiest first
    pub top_modules: Vec<ModuleCount>,
    /// Most recent entries, newest first
    pub recent: Vec<LogEntry>,
    pub total: usize,
    /// Share of WARN and ERROR entries in percent, one decimal
    pub error_ratio: f64,
}

/// System settings are an open JSON object (`appName`, `language`, `security`, ...)
pub type SystemSettings = serde_json::Map<String, serde_json::Value>;
