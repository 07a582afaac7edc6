//! Mock dashboard

use async_trait::async_trait;
use std::time::Duration;

use super::{load_fixture, simulate_latency};
use crate::api::DashboardApi;
use crate::http::ApiError;
use crate::models::{DashboardMetrics, SummaryCard};

pub struct MockDashboardApi {
    metrics: DashboardMetrics,
    latency: Duration,
}

impl MockDashboardApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            metrics: load_fixture("dashboard.json"),
            latency,
        }
    }
}

#[async_trait]
impl DashboardApi for MockDashboardApi {
    async fn fetch_overview(&self) -> Result<Vec<SummaryCard>, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.metrics.summary_cards.clone())
    }

    async fn fetch_metrics(&self) -> Result<DashboardMetrics, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.metrics.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overview_is_the_summary_cards() {
        let api = MockDashboardApi::new(Duration::ZERO);
        let cards = api.fetch_overview().await.unwrap();
        let metrics = api.fetch_metrics().await.unwrap();

        assert!(!cards.is_empty());
        assert_eq!(cards, metrics.summary_cards);
        assert_eq!(cards[0].key, "users");
    }
}
