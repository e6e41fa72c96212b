//! Task Service - Business logic layer

use std::sync::Arc;

use axum_helpers::extractors::validated_json::first_validation_message;
use serde_json::{Map, Value};
use tracing::instrument;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, NewTask, Task, TaskPatch};
use crate::repository::TaskRepository;

/// Task service providing business logic operations
///
/// The service layer handles validation, merge semantics, and orchestrates
/// repository operations. It holds no task state between calls.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    /// Create a new TaskService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task with a store-assigned id
    #[instrument(skip(self, input))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(first_validation_message(&e)))?;

        // Validation guarantees the title is present and non-blank
        let task = NewTask {
            title: input.title.unwrap_or_default(),
            description: input.description,
            done: input.done,
        };

        self.repository.create(task).await
    }

    /// Get a task by id
    #[instrument(skip(self))]
    pub async fn get_task(&self, id: i64) -> TaskResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// List all tasks in id order
    #[instrument(skip(self))]
    pub async fn list_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.find_all().await
    }

    /// Apply a partial update to an existing task.
    ///
    /// NotFound short-circuits before the field map is inspected, matching
    /// the lookup-then-validate order of the HTTP contract.
    #[instrument(skip(self, fields))]
    pub async fn update_task(&self, id: i64, fields: Map<String, Value>) -> TaskResult<Task> {
        let mut task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        let patch = TaskPatch::from_object(&fields)?;
        task.apply_patch(patch);

        self.repository.save(task).await
    }

    /// Delete a task
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: i64) -> TaskResult<()> {
        if self.repository.delete_by_id(id).await? {
            Ok(())
        } else {
            Err(TaskError::NotFound(id))
        }
    }
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
