use async_trait::async_trait;

use crate::error::TaskResult;
use crate::models::{NewTask, Task};

/// Repository trait for Task persistence
///
/// This trait defines the data access interface for tasks. Implementations
/// can use different storage backends (Postgres, in-memory).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task, assigning its identifier
    async fn create(&self, input: NewTask) -> TaskResult<Task>;

    /// Look up a task by id; absence is not an error
    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>>;

    /// All stored tasks, ordered by id
    async fn find_all(&self) -> TaskResult<Vec<Task>>;

    /// Upsert by id: update the row if it exists, insert it otherwise
    async fn save(&self, task: Task) -> TaskResult<Task>;

    /// Delete a task by id, reporting whether a row was removed
    async fn delete_by_id(&self, id: i64) -> TaskResult<bool>;
}
