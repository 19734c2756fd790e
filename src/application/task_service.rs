use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{PlannerTask, Roomie, TaskPayload};
use crate::domain::repository::TaskRepository;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>) -> Self {
        Self { tasks }
    }

    pub async fn list_tasks(&self) -> DomainResult<Vec<PlannerTask>> {
        self.tasks.list_tasks().await
    }

    pub async fn get_task(&self, task_id: i64) -> DomainResult<PlannerTask> {
        self.tasks
            .find_task_by_id(task_id)
            .await?
            .ok_or_else(|| DomainError::task_not_found(task_id))
    }

    #[instrument(skip(self, payload), fields(task_name = %payload.task_name))]
    pub async fn create_task(&self, payload: TaskPayload) -> DomainResult<PlannerTask> {
        if payload.task_name.trim().is_empty() {
            return Err(DomainError::Validation("Task data is invalid.".to_string()));
        }
        let task = self.tasks.create_task(payload.into_new_task()).await?;
        info!(task_id = task.task_id, "Task created");
        Ok(task)
    }

    /// The task must already exist; the lookup happens before any write.
    #[instrument(skip(self, payload))]
    pub async fn update_task(&self, task_id: i64, payload: TaskPayload) -> DomainResult<PlannerTask> {
        if payload.task_id != Some(task_id) || payload.task_name.trim().is_empty() {
            warn!(task_id = task_id, body_task_id = ?payload.task_id, "Task update rejected");
            return Err(DomainError::Validation(
                "Task data is invalid or Task IDs do not match.".to_string(),
            ));
        }

        self.get_task(task_id).await?;
        let task = self.tasks.update_task(payload.into_task(task_id)).await?;
        info!(task_id = task_id, "Task updated");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, task_id: i64) -> DomainResult<()> {
        self.get_task(task_id).await?;
        self.tasks.delete_task(task_id).await?;
        info!(task_id = task_id, "Task deleted");
        Ok(())
    }

    /// Assigns in order and stops at the first failure. Assignments made
    /// before the failure are kept.
    #[instrument(skip(self, roomie_ids), fields(count = roomie_ids.len()))]
    pub async fn add_roomies_to_task(&self, task_id: i64, roomie_ids: &[i64]) -> DomainResult<()> {
        if roomie_ids.is_empty() {
            return Err(DomainError::Validation("No roomie IDs provided.".to_string()));
        }

        for &roomie_id in roomie_ids {
            match self.tasks.assign_roomie(task_id, roomie_id).await {
                Ok(()) => debug!(task_id = task_id, roomie_id = roomie_id, "Roomie assigned"),
                Err(DomainError::NotFound(reason)) | Err(DomainError::Conflict(reason)) => {
                    warn!(task_id = task_id, roomie_id = roomie_id, reason = %reason, "Assignment failed");
                    return Err(DomainError::Validation(format!(
                        "Failed to assign Roomie ID {} to Task ID {}.",
                        roomie_id, task_id
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        info!(task_id = task_id, "Roomies assigned");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_roomie_from_task(&self, task_id: i64, roomie_id: i64) -> DomainResult<()> {
        match self.tasks.remove_roomie(task_id, roomie_id).await {
            Ok(()) => {
                info!(task_id = task_id, roomie_id = roomie_id, "Roomie removed from task");
                Ok(())
            }
            Err(DomainError::NotFound(_)) => Err(DomainError::Validation(format!(
                "Failed to remove Roomie ID {} from Task ID {}.",
                roomie_id, task_id
            ))),
            Err(e) => Err(e),
        }
    }

    pub async fn roomies_for_task(&self, task_id: i64) -> DomainResult<Vec<Roomie>> {
        let roomies = self.tasks.roomies_for_task(task_id).await?;
        if roomies.is_empty() {
            return Err(DomainError::NotFound(format!(
                "No roomies found for Task ID {}.",
                task_id
            )));
        }
        Ok(roomies)
    }
}
