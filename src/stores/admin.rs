//! Admin board store

use std::sync::Arc;
use tokio::sync::RwLock;

use super::{failure, StoreError};
use crate::api::AdminApi;
use crate::models::{
    default_page, AdminOverview, Alert, AuditEvent, CreateTaskInput, Paged, Task, TaskQuery,
    UpdateTaskInput,
};

#[derive(Debug, Clone, Default)]
pub struct AdminBoardState {
    pub overview: Option<AdminOverview>,
    pub alerts: Vec<Alert>,
    pub task_query: TaskQuery,
    pub tasks: Paged<Task>,
    pub timeline: Vec<AuditEvent>,
}

/// Store behind the operations board
pub struct AdminStore {
    api: Arc<dyn AdminApi>,
    state: RwLock<AdminBoardState>,
}

impl AdminStore {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        let state = AdminBoardState {
            tasks: Paged {
                page_size: TaskQuery::default().page_size,
                ..Default::default()
            },
            ..Default::default()
        };
        Self {
            api,
            state: RwLock::new(state),
        }
    }

    pub async fn snapshot(&self) -> AdminBoardState {
        self.state.read().await.clone()
    }

    pub async fn fetch_overview(&self) -> Result<AdminOverview, StoreError> {
        let overview = self
            .api
            .fetch_overview()
            .await
            .map_err(|e| failure("fetch_overview", None, e))?;
        self.state.write().await.overview = Some(overview.clone());
        Ok(overview)
    }

    pub async fn fetch_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        let alerts = self
            .api
            .fetch_alerts()
            .await
            .map_err(|e| failure("fetch_alerts", None, e))?;
        self.state.write().await.alerts = alerts.clone();
        Ok(alerts)
    }

    pub async fn acknowledge_alert(&self, id: &str) -> Result<Alert, StoreError> {
        let alert = self
            .api
            .acknowledge_alert(id)
            .await
            .map_err(|e| failure("acknowledge_alert", Some(id), e))?;

        let mut state = self.state.write().await;
        if let Some(entry) = state.alerts.iter_mut().find(|a| a.id == alert.id) {
            *entry = alert.clone();
        }
        Ok(alert)
    }

    pub async fn fetch_tasks(&self) -> Result<Paged<Task>, StoreError> {
        let query = self.state.read().await.task_query.clone();
        let tasks = self
            .api
            .fetch_tasks(&query)
            .await
            .map_err(|e| failure("fetch_tasks", None, e))?;
        self.state.write().await.tasks = tasks.clone();
        Ok(tasks)
    }

    /// Change task filters; paging restarts at the first page
    pub async fn set_task_filters(&self, update: impl FnOnce(&mut TaskQuery) + Send) {
        let mut state = self.state.write().await;
        update(&mut state.task_query);
        state.task_query.page = default_page();
    }

    /// Create a task, then reload the first page of the board
    pub async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, StoreError> {
        let task = self
            .api
            .create_task(input)
            .await
            .map_err(|e| failure("create_task", None, e))?;
        tracing::info!(id = %task.id, "Task created");

        self.state.write().await.task_query.page = default_page();
        self.fetch_tasks().await?;
        Ok(task)
    }

    pub async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> Result<Task, StoreError> {
        let task = self
            .api
            .update_task(id, input)
            .await
            .map_err(|e| failure("update_task", Some(id), e))?;

        let mut state = self.state.write().await;
        if let Some(entry) = state.tasks.items.iter_mut().find(|t| t.id == task.id) {
            *entry = task.clone();
        }
        Ok(task)
    }

    pub async fn fetch_timeline(&self) -> Result<Vec<AuditEvent>, StoreError> {
        let timeline = self
            .api
            .fetch_audit_timeline()
            .await
            .map_err(|e| failure("fetch_timeline", None, e))?;
        self.state.write().await.timeline = timeline.clone();
        Ok(timeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAdminApi;
    use std::time::Duration;

    fn store() -> AdminStore {
        AdminStore::new(Arc::new(MockAdminApi::new(Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_acknowledge_updates_cached_alert() {
        let store = store();
        store.fetch_alerts().await.unwrap();
        store.acknowledge_alert("AL-9102").await.unwrap();

        let state = store.snapshot().await;
        assert!(state.alerts.iter().any(|a| a.id == "AL-9102" && a.acknowledged));
    }

    #[tokio::test]
    async fn test_task_board_round() {
        let store = store();
        store.set_task_filters(|q| q.priority = Some("all".to_string())).await;
        store.fetch_tasks().await.unwrap();
        assert_eq!(store.snapshot().await.tasks.total, 4);

        let task = store
            .create_task(&CreateTaskInput {
                title: Some("Rotate keys".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let state = store.snapshot().await;
        assert_eq!(state.tasks.total, 5);
        assert_eq!(state.tasks.items[0].id, task.id);

        let input = UpdateTaskInput {
            assignee: Some("Chen".to_string()),
            ..Default::default()
        };
        store.update_task(&task.id, &input).await.unwrap();
        assert_eq!(store.snapshot().await.tasks.items[0].assignee, "Chen");

        let err = store.update_task("TASK-1", &input).await.unwrap_err();
        assert_eq!(err.operation, "update_task");
    }

    #[tokio::test]
    async fn test_overview_and_timeline() {
        let store = store();
        store.fetch_overview().await.unwrap();
        store.fetch_timeline().await.unwrap();

        let state = store.snapshot().await;
        assert_eq!(state.overview.unwrap().cards.len(), 4);
        assert_eq!(state.timeline.len(), 4);
    }
}
