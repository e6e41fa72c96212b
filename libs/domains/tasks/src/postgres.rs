use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

use crate::{
    entity,
    error::TaskResult,
    models::{NewTask, Task},
    repository::TaskRepository,
};

/// Postgres-backed task store.
///
/// The connection is a SeaORM pool; each operation acquires and releases a
/// connection internally, so a failed request cannot leak one.
pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn create(&self, input: NewTask) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(task_id = model.id, "Created task");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(|m| m.into()))
    }

    async fn find_all(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }

    async fn save(&self, task: Task) -> TaskResult<Task> {
        // Single-statement upsert; a concurrent delete cannot strand an update
        let active_model: entity::ActiveModel = task.into();
        let model = entity::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(entity::Column::Id)
                    .update_columns([
                        entity::Column::Title,
                        entity::Column::Description,
                        entity::Column::Done,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        tracing::info!(task_id = model.id, "Saved task");
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: i64) -> TaskResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
