//! System logs and settings store

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{failure, StoreError};
use crate::api::SystemApi;
use crate::models::{default_page, LogEntry, LogQuery, LogSummary, Paged, SystemSettings};

#[derive(Debug, Clone, Default)]
pub struct SystemState {
    pub log_query: LogQuery,
    pub logs: Paged<LogEntry>,
    pub summary: Option<LogSummary>,
    pub settings: Option<SystemSettings>,
}

/// Store behind the log viewer and the settings form
pub struct SystemStore {
    api: Arc<dyn SystemApi>,
    state: RwLock<SystemState>,
}

impl SystemStore {
    pub fn new(api: Arc<dyn SystemApi>) -> Self {
        Self {
            api,
            state: RwLock::new(SystemState::default()),
        }
    }

    pub async fn snapshot(&self) -> SystemState {
        self.state.read().await.clone()
    }

    pub async fn fetch_logs(&self) -> Result<Paged<LogEntry>, StoreError> {
        let query = self.state.read().await.log_query.clone();
        let logs = self
            .api
            .fetch_logs(&query)
            .await
            .map_err(|e| failure("fetch_logs", None, e))?;
        self.state.write().await.logs = logs.clone();
        Ok(logs)
    }

    /// Change log filters; paging restarts at the first page
    pub async fn set_log_filters(&self, update: impl FnOnce(&mut LogQuery) + Send) {
        let mut state = self.state.write().await;
        update(&mut state.log_query);
        state.log_query.page = default_page();
    }

    pub async fn set_log_page(&self, page: u32) {
        self.state.write().await.log_query.page = page.max(1);
    }

    pub async fn fetch_summary(&self) -> Result<LogSummary, StoreError> {
        let summary = self
            .api
            .fetch_log_summary()
            .await
            .map_err(|e| failure("fetch_summary", None, e))?;
        self.state.write().await.summary = Some(summary.clone());
        Ok(summary)
    }

    pub async fn fetch_settings(&self) -> Result<SystemSettings, StoreError> {
        let settings = self
            .api
            .fetch_settings()
            .await
            .map_err(|e| failure("fetch_settings", None, e))?;
        self.state.write().await.settings = Some(settings.clone());
        Ok(settings)
    }

    pub async fn update_settings(&self, patch: &SystemSettings) -> Result<SystemSettings, StoreError> {
        let settings = self
            .api
            .update_settings(patch)
            .await
            .map_err(|e| failure("update_settings", None, e))?;
        tracing::info!(keys = patch.len(), "Settings updated");
        self.state.write().await.settings = Some(settings.clone());
        Ok(settings)
    }
}
