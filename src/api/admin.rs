//! Admin board API
//!
//! Handles the operations board:
//! - Overview cards, traffic trend, service health and shifts
//! - Alerts and their acknowledgement
//! - The task board
//! - The audit timeline

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use crate::http::{ApiError, HttpClient};
use crate::models::{
    AdminOverview, Alert, AuditEvent, CreateTaskInput, Paged, QueryPairs, Task, TaskQuery,
    UpdateTaskInput,
};

/// Admin board endpoints
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn fetch_overview(&self) -> Result<AdminOverview, ApiError>;

    async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError>;

    /// Mark an alert as acknowledged and return it
    async fn acknowledge_alert(&self, id: &str) -> Result<Alert, ApiError>;

    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Paged<Task>, ApiError>;

    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ApiError>;

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> Result<Task, ApiError>;

    async fn fetch_audit_timeline(&self) -> Result<Vec<AuditEvent>, ApiError>;
}

/// Admin API backed by the REST backend
pub struct HttpAdminApi {
    client: HttpClient,
}

impl HttpAdminApi {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn boxed(client: HttpClient) -> Arc<dyn AdminApi> {
        Arc::new(Self::new(client))
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn fetch_overview(&self) -> Result<AdminOverview, ApiError> {
        self.client.get("admin/overview", Vec::new()).await
    }

    async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.client.get("admin/alerts", Vec::new()).await
    }

    async fn acknowledge_alert(&self, id: &str) -> Result<Alert, ApiError> {
        self.client
            .post(
                &format!("admin/alerts/{}/acknowledge", urlencoding::encode(id)),
                &json!({}),
            )
            .await
    }

    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Paged<Task>, ApiError> {
        self.client.get("admin/tasks", query.query_pairs()).await
    }

    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ApiError> {
        self.client.post("admin/tasks", input).await
    }

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> Result<Task, ApiError> {
        self.client
            .patch(&format!("admin/tasks/{}", urlencoding::encode(id)), input)
            .await
    }

    async fn fetch_audit_timeline(&self) -> Result<Vec<AuditEvent>, ApiError> {
        self.client.get("admin/audit-timeline", Vec::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::client_for;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn task(id: &str, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Review admin permission matrix",
            "assignee": "Linda",
            "avatarColor": "#2563eb",
            "due": "2025-10-06",
            "priority": "high",
            "status": status,
            "tags": ["security"]
        })
    }

    #[tokio::test]
    async fn test_task_board_routes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/tasks"))
            .and(query_param("pageSize", "8"))
            .and(query_param("status", "in_progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [task("TASK-5021", "in_progress")],
                "total": 1,
                "page": 1,
                "pageSize": 8
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/admin/tasks/TASK-5021"))
            .and(body_json(json!({"status": "done"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(task("TASK-5021", "done")))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpAdminApi::new(client_for(&server.uri()));
        let query = TaskQuery {
            status: Some("in_progress".to_string()),
            ..Default::default()
        };
        let page = api.fetch_tasks(&query).await.unwrap();
        assert_eq!(page.items[0].id, "TASK-5021");

        let input = UpdateTaskInput {
            status: Some("done".to_string()),
            ..Default::default()
        };
        let updated = api.update_task("TASK-5021", &input).await.unwrap();
        assert_eq!(updated.status, "done");
    }

    #[tokio::test]
    async fn test_acknowledge_alert() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/admin/alerts/AL-9101/acknowledge"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "AL-9101",
                "severity": "high",
                "title": "Card channel latency",
                "acknowledged": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpAdminApi::new(client_for(&server.uri()));
        let alert = api.acknowledge_alert("AL-9101").await.unwrap();
        assert!(alert.acknowledged);
        assert_eq!(alert.owner, "");
    }
}
