use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;
use uuid::Uuid;

use super::ApiClient;
use crate::error::CoreError;
use crate::models::{EditScope, NewTaskData, Task, TaskChanges, TaskStatus};

/// Server-side filters for task listings.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub category: Option<String>,
    pub archived: Option<bool>,
    pub due_before: Option<DateTime<Utc>>,
}

impl TaskQuery {
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(archived) = self.archived {
            params.push(("archived", archived.to_string()));
        }
        if let Some(due_before) = self.due_before {
            params.push(("due_before", due_before.to_rfc3339()));
        }
        params
    }
}

#[derive(Debug, Serialize)]
struct SeriesUpdateRequest<'a> {
    update_type: EditScope,
    occurrence_index: u32,
    #[serde(flatten)]
    changes: &'a TaskChanges,
}

impl ApiClient {
    pub async fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>, CoreError> {
        let params = query.to_params();
        self.execute(Method::GET, "tasks", true, |request| {
            request.query(&params)
        })
        .await
    }

    pub async fn create_task(&self, data: &NewTaskData) -> Result<Task, CoreError> {
        self.execute(Method::POST, "tasks", false, |request| request.json(data))
            .await
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, CoreError> {
        self.execute(Method::GET, &format!("tasks/{}", id), true, |request| {
            request
        })
        .await
    }

    pub async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> Result<Task, CoreError> {
        self.execute(Method::PUT, &format!("tasks/{}", id), false, |request| {
            request.json(changes)
        })
        .await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), CoreError> {
        self.execute_unit(Method::DELETE, &format!("tasks/{}", id), false, |request| {
            request
        })
        .await
    }

    pub async fn complete_task(&self, id: Uuid) -> Result<Task, CoreError> {
        let changes = TaskChanges {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        self.update_task(id, &changes).await
    }

    /// Materialized occurrences of a recurring series, ordered by index.
    pub async fn series_instances(&self, series_root: Uuid) -> Result<Vec<Task>, CoreError> {
        self.execute(
            Method::GET,
            &format!("tasks/recurring/{}", series_root),
            true,
            |request| request,
        )
        .await
    }

    /// Applies a scoped edit to a recurring series. The scope/rule guard is
    /// enforced locally before touching the wire, matching the expander.
    pub async fn update_series(
        &self,
        series_root: Uuid,
        occurrence_index: u32,
        changes: &TaskChanges,
        scope: EditScope,
    ) -> Result<Vec<Task>, CoreError> {
        if changes.touches_rrule() && scope != EditScope::EntireSeries {
            return Err(CoreError::InvalidInput(format!(
                "Recurrence rule changes require scope 'all', got '{}'",
                scope
            )));
        }

        let body = SeriesUpdateRequest {
            update_type: scope,
            occurrence_index,
            changes,
        };
        self.execute(
            Method::PUT,
            &format!("tasks/recurring/{}", series_root),
            false,
            |request| request.json(&body),
        )
        .await
    }

    /// Applies a scoped delete to a recurring series.
    pub async fn delete_series(
        &self,
        series_root: Uuid,
        occurrence_index: u32,
        scope: EditScope,
    ) -> Result<(), CoreError> {
        let params = [
            ("delete_type", scope.to_string()),
            ("occurrence_index", occurrence_index.to_string()),
        ];
        self.execute_unit(
            Method::DELETE,
            &format!("tasks/recurring/{}", series_root),
            false,
            |request| request.query(&params),
        )
        .await
    }
}
