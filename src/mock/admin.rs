//! Mock admin board

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::RwLock;

use super::{load_fixture, simulate_latency, today};
use crate::api::AdminApi;
use crate::http::ApiError;
use crate::models::{
    AdminOverview, Alert, AuditEvent, CreateTaskInput, Paged, RecordId, Task, TaskQuery,
    UpdateTaskInput,
};
use crate::query::{filter_by_keyword, is_active_filter, paginate_list, sort_by_field};

const KEYWORD_FIELDS: [&str; 3] = ["title", "assignee", "tags"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdminBoard {
    #[serde(flatten)]
    overview: AdminOverview,
    #[serde(default)]
    alerts: Vec<Alert>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    audit_timeline: Vec<AuditEvent>,
}

fn task_not_found() -> ApiError {
    ApiError::not_found("Task not found")
}

/// Next `TASK-<n>` id after the highest existing one
fn next_task_id(tasks: &[Task]) -> String {
    let max = tasks
        .iter()
        .filter_map(|t| RecordId::from(t.id.as_str()).numeric())
        .max()
        .unwrap_or(0);
    format!("TASK-{}", max + 1)
}

/// Admin API over the seed board
pub struct MockAdminApi {
    board: RwLock<AdminBoard>,
    latency: Duration,
}

impl MockAdminApi {
    pub fn new(latency: Duration) -> Self {
        Self {
            board: RwLock::new(load_fixture("admin.json")),
            latency,
        }
    }
}

#[async_trait]
impl AdminApi for MockAdminApi {
    async fn fetch_overview(&self) -> Result<AdminOverview, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.board.read().await.overview.clone())
    }

    async fn fetch_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.board.read().await.alerts.clone())
    }

    async fn acknowledge_alert(&self, id: &str) -> Result<Alert, ApiError> {
        simulate_latency(self.latency).await;

        let mut board = self.board.write().await;
        let alert = board
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| ApiError::not_found("Alert not found"))?;
        alert.acknowledged = true;
        Ok(alert.clone())
    }

    async fn fetch_tasks(&self, query: &TaskQuery) -> Result<Paged<Task>, ApiError> {
        simulate_latency(self.latency).await;

        let tasks = self.board.read().await.tasks.clone();
        let mut tasks = filter_by_keyword(tasks, query.keyword.as_deref(), &KEYWORD_FIELDS);
        if let Some(status) = is_active_filter(query.status.as_deref()) {
            tasks.retain(|t| t.status == status);
        }
        if let Some(priority) = is_active_filter(query.priority.as_deref()) {
            tasks.retain(|t| t.priority == priority);
        }
        if !query.tags.is_empty() {
            tasks.retain(|t| t.tags.iter().any(|tag| query.tags.contains(tag)));
        }

        let sorted = sort_by_field(tasks, query.sorter.as_ref());
        Ok(paginate_list(&sorted, query.page, query.page_size))
    }

    async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ApiError> {
        simulate_latency(self.latency).await;

        let mut board = self.board.write().await;
        let input = input.clone();
        let task = Task {
            id: next_task_id(&board.tasks),
            title: input.title.unwrap_or_else(|| "New task".to_string()),
            assignee: input.assignee.unwrap_or_else(|| "Unassigned".to_string()),
            avatar_color: input.avatar_color.unwrap_or_else(|| "#64748b".to_string()),
            due: input.due.unwrap_or_else(today),
            priority: input.priority.unwrap_or_else(|| "low".to_string()),
            status: input.status.unwrap_or_else(|| "todo".to_string()),
            tags: input.tags.unwrap_or_default(),
        };

        board.tasks.insert(0, task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> Result<Task, ApiError> {
        simulate_latency(self.latency).await;

        let mut board = self.board.write().await;
        let task = board
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(task_not_found)?;
        input.clone().apply_to(task);
        Ok(task.clone())
    }

    async fn fetch_audit_timeline(&self) -> Result<Vec<AuditEvent>, ApiError> {
        simulate_latency(self.latency).await;
        Ok(self.board.read().await.audit_timeline.clone())
    }
}
