use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::TaskResult,
    models::{NewTask, Task},
    repository::TaskRepository,
};

/// In-memory task store.
///
/// Used by tests and as the startup fallback when no database is configured.
/// Ids are assigned from an atomic counter, so they stay monotonic like the
/// Postgres identity column. BTreeMap iteration gives id-ordered listing.
#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: RwLock<BTreeMap<i64, Task>>,
    next_id: AtomicI64,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn create(&self, input: NewTask) -> TaskResult<Task> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            id,
            title: input.title,
            description: input.description,
            done: input.done,
        };

        self.tasks.write().await.insert(id, task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        Ok(self.tasks.read().await.values().cloned().collect())
    }

    async fn save(&self, task: Task) -> TaskResult<Task> {
        // Keep the counter ahead of explicitly saved ids so create stays
        // collision-free
        self.next_id.fetch_max(task.id + 1, Ordering::SeqCst);
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete_by_id(&self, id: i64) -> TaskResult<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
            done: false,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_monotonic_ids() {
        let repo = MemoryTaskRepository::new();

        let first = repo.create(new_task("one")).await.unwrap();
        let second = repo.create(new_task("two")).await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_find_all_is_id_ordered() {
        let repo = MemoryTaskRepository::new();
        for title in ["a", "b", "c"] {
            repo.create(new_task(title)).await.unwrap();
        }

        let all = repo.find_all().await.unwrap();
        let ids: Vec<i64> = all.iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_save_upserts_and_keeps_counter_ahead() {
        let repo = MemoryTaskRepository::new();

        // Insert with an explicit id, as the upsert path allows
        let saved = repo
            .save(Task {
                id: 10,
                title: "explicit".to_string(),
                description: None,
                done: false,
            })
            .await
            .unwrap();
        assert_eq!(saved.id, 10);

        // A subsequent create must not collide with the saved id
        let created = repo.create(new_task("next")).await.unwrap();
        assert!(created.id > 10);

        // Updating through save replaces the stored row
        let updated = repo
            .save(Task {
                id: 10,
                title: "explicit".to_string(),
                description: None,
                done: true,
            })
            .await
            .unwrap();
        assert!(updated.done);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_signals_absence() {
        let repo = MemoryTaskRepository::new();
        let task = repo.create(new_task("gone soon")).await.unwrap();

        assert!(repo.delete_by_id(task.id).await.unwrap());
        assert!(!repo.delete_by_id(task.id).await.unwrap());
        assert!(repo.find_by_id(task.id).await.unwrap().is_none());
    }
}
