//! System API: operation logs and settings

use async_trait::async_trait;
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{LogEntry, LogQuery, LogSummary, Paged, QueryPairs, SystemSettings};

/// System endpoints
#[async_trait]
pub trait SystemApi: Send + Sync {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<Paged<LogEntry>, ApiError>;

    /// Per-level counts, busiest modules and the latest entries
    async fn fetch_log_summary(&self) -> Result<LogSummary, ApiError>;

    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError>;

    /// Shallow-merge `patch` into the settings and return the result
    async fn update_settings(&self, patch: &SystemSettings) -> Result<SystemSettings, ApiError>;
}

/// System API backed by the REST backend
pub struct HttpSystemApi {
    client: HttpClient,
}

impl HttpSystemApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn SystemApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl SystemApi for HttpSystemApi {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<Paged<LogEntry>, ApiError> {
        self.client.get("system/logs", query.query_pairs()).await
    }

    async fn fetch_log_summary(&self) -> Result<LogSummary, ApiError> {
        self.client.get("system/logs/summary", Vec::new()).await
    }

    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError> {
        self.client.get("system/settings", Vec::new()).await
    }

    async fn update_settings(&self, patch: &SystemSettings) -> Result<SystemSettings, ApiError> {
        self.client.put("system/settings", patch).await
    }
}
