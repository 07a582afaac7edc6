//! Mock operation logs and settings

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::RwLock;

use super::{load_fixture, simulate_latency};
use crate::api::SystemApi;
use crate::http::ApiError;
use crate::models::{LogEntry, LogQuery, LogSummary, ModuleCount, Paged, SystemSettings, SUMMARY_LEVELS};
use crate::query::{filter_by_keyword, is_active_filter, paginate_list, sort_by_field};

const KEYWORD_FIELDS: [&str; 3] = ["message", "module", "context.requestId"];
const TOP_MODULES: usize = 5;
const RECENT_ENTRIES: usize = 6;

/// Aggregate a log list into per-level counts, busiest modules and latest entries
pub fn compute_log_summary(logs: &[LogEntry]) -> LogSummary {
    let mut severity: BTreeMap<String, usize> =
        SUMMARY_LEVELS.iter().map(|level| (level.to_string(), 0)).collect();
    let mut modules: HashMap<&str, usize> = HashMap::new();

    for entry in logs {
        if let Some(count) = severity.get_mut(&entry.level.to_uppercase()) {
            *count += 1;
        }
        *modules.entry(entry.module.as_str()).or_default() += 1;
    }

    let mut top_modules: Vec<ModuleCount> = modules
        .into_iter()
        .map(|(module, total)| ModuleCount {
            module: module.to_string(),
            total,
        })
        .collect();
    top_modules.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.module.cmp(&b.module)));
    top_modules.truncate(TOP_MODULES);

    let mut recent = logs.to_vec();
    recent.sort_by(|a, b| b.time.cmp(&a.time));
    recent.truncate(RECENT_ENTRIES);

    let total = logs.len();
    let flagged = severity.get("ERROR").copied().unwrap_or(0) + severity.get("WARN").copied().unwrap_or(0);
    let error_ratio = if total == 0 {
        0.0
    } else {
        (flagged as f64 / total as f64 * 1000.0).round() / 10.0
    };

    LogSummary {
        severity,
        top_modules,
        recent,
        total,
        error_ratio,
    }
}

/// System API over the seed log list and settings
pub struct MockSystemApi {
    logs: Vec<LogEntry>,
    settings: RwLock<SystemSettings>,
    latency: Duration,
}

impl MockSystemApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            logs: load_fixture("system_logs.json"),
            settings: RwLock::new(load_fixture("system_settings.json")),
            latency,
        }
    }
}

#[async_trait]
impl SystemApi for MockSystemApi {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<Paged<LogEntry>, ApiError> {
        simulate_latency(self.latency).await;

        let mut logs = filter_by_keyword(self.logs.clone(), query.keyword.as_deref(), &KEYWORD_FIELDS);
        if let Some(level) = is_active_filter(query.level.as_deref()) {
            logs.retain(|entry| entry.level.eq_ignore_ascii_case(level));
        }
        let sorted = sort_by_field(logs, query.sorter.as_ref());
        Ok(paginate_list(&sorted, query.page, query.page_size))
    }

    async fn fetch_log_summary(&self) -> Result<LogSummary, ApiError> {
        simulate_latency(self.latency).await;
        Ok(compute_log_summary(&self.logs))
    }

    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.settings.read().await.clone())
    }

    async fn update_settings(&self, patch: &SystemSettings) -> Result<SystemSettings, ApiError> {
        simulate_latency(self.latency).await;

        let mut settings = self.settings.write().await;
        for (key, value) in patch {
            settings.insert(key.clone(), value.clone());
        }
        Ok(settings.clone())
    }
}
