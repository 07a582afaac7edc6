//! Dashboard API

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{DashboardMetrics, SummaryCard};

/// Dashboard endpoints
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Headline cards
    async fn fetch_overview(&self) -> Result<Vec<SummaryCard>, ApiError>;

    /// Cards plus charts, recent activity and health
    async fn fetch_metrics(&self) -> Result<DashboardMetrics, ApiError>;
}

/// `dashboard/overview` answers with either the cards or the full metrics payload
#[derive(Deserialize)]
#[serde(untagged)]
enum OverviewPayload {
    Cards(Vec<SummaryCard>),
    Metrics(DashboardMetrics),
}

/// Dashboard API backed by the REST backend
pub struct HttpDashboardApi {
    client: HttpClient,
}

impl HttpDashboardApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn DashboardApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn fetch_overview(&self) -> Result<Vec<SummaryCard>, ApiError> {
        let payload: OverviewPayload = self.client.get("dashboard/overview", Vec::new()).await?;
        Ok(match payload {
            OverviewPayload::Cards(cards) => cards,
            OverviewPayload::Metrics(metrics) => metrics.summary_cards,
        })
    }

    async fn fetch_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        self.client.get("dashboard/metrics", Vec::new()).await
    }
}
