//! Dashboard models

use serde::{Deserialize, Serialize};

/// A headline metric card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub key: String,
    pub title: String,
    /// Numeric or preformatted (`"99.98%"`)
    pub value: serde_json::Value,
    /// Preformatted (`"+8.4%"`) from the mock backend, a number from the REST backend
    #[serde(default)]
    pub change: Option<serde_json::Value>,
    /// up, down or flat
    #[serde(default)]
    pub trend: Option<String>,
}

/// Full dashboard payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub summary_cards: Vec<SummaryCard>,
    #[serde(default)]
    pub traffic_chart: serde_json::Value,
    #[serde(default)]
    pub recent_activities: Vec<serde_json::Value>,
    #[serde(default)]
    pub system_health: Vec<serde_json::Value>,
}
