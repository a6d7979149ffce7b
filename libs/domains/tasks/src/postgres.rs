use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{task, task_item},
    error::{TaskError, TaskResult},
    models::{
        NewTask, Task, TaskItem, TaskItemStatus, TaskListCondition, TaskReplacement, TaskSort,
    },
    repository::TaskRepository,
};

/// Title or any item's content contains the pattern, case-insensitively
const KEYWORD_FILTER: &str = r#"("tasks"."title" ILIKE $1 OR EXISTS (SELECT 1 FROM "task_items" AS "ti" WHERE "ti"."task_id" = "tasks"."id" AND "ti"."content" ILIKE $2))"#;

pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Items of `task_ids`, grouped by task and in display order
    async fn load_items<C: ConnectionTrait>(
        conn: &C,
        task_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, Vec<TaskItem>>, DbErr> {
        let models = task_item::Entity::find()
            .filter(task_item::Column::TaskId.is_in(task_ids))
            .order_by_asc(task_item::Column::Order)
            .order_by_asc(task_item::Column::CreatedAt)
            .order_by_asc(task_item::Column::Id)
            .all(conn)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<TaskItem>> = HashMap::new();
        for model in models {
            grouped.entry(model.task_id).or_default().push(model.into());
        }
        Ok(grouped)
    }

    async fn hydrate<C: ConnectionTrait>(
        conn: &C,
        models: Vec<task::Model>,
    ) -> Result<Vec<Task>, DbErr> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids = models.iter().map(|m| m.id).collect();
        let mut items = Self::load_items(conn, ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let task_items = items.remove(&model.id).unwrap_or_default();
                model.into_task(task_items)
            })
            .collect())
    }

    async fn find_task<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Task>, DbErr> {
        let Some(model) = task::Entity::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };
        Ok(Self::hydrate(conn, vec![model]).await?.pop())
    }
}

fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// An update that matched no row
fn is_missing_row(err: &DbErr) -> bool {
    matches!(err, DbErr::RecordNotUpdated | DbErr::RecordNotFound(_))
}

/// A foreign-key failure on insert means the owner account does not exist
fn map_insert_error(err: DbErr, owner_id: Uuid) -> TaskError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            TaskError::Validation(format!("Owner account {} does not exist", owner_id))
        }
        _ => err.into(),
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, condition: TaskListCondition) -> TaskResult<Vec<Task>> {
        let mut query = task::Entity::find();

        if let Some(owner_id) = condition.owner_id {
            query = query.filter(task::Column::OwnerId.eq(owner_id));
        }

        if let Some(year_month) = condition.year_month {
            query = query.filter(
                task::Column::Date.between(year_month.first_day(), year_month.last_day()),
            );
        }

        if let Some(keyword) = condition.keyword.as_deref() {
            let pattern = format!("%{}%", escape_like(keyword));
            query = query.filter(Expr::cust_with_values(
                KEYWORD_FILTER,
                [pattern.clone(), pattern],
            ));
        }

        query = match condition.sort {
            TaskSort::Oldest => query.order_by_asc(task::Column::CreatedAt),
            TaskSort::DateAsc => query
                .order_by_asc(task::Column::Date)
                .order_by_desc(task::Column::CreatedAt),
            TaskSort::DateDesc => query
                .order_by_desc(task::Column::Date)
                .order_by_desc(task::Column::CreatedAt),
            _ => query.order_by_desc(task::Column::CreatedAt),
        }
        .order_by_desc(task::Column::Id);

        let models = query.all(&self.db).await?;
        let mut tasks = Self::hydrate(&self.db, models).await?;
        condition.sort.apply_derived(&mut tasks);

        tracing::debug!(count = tasks.len(), sort = %condition.sort, "Listed tasks");
        Ok(tasks)
    }

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        Ok(Self::find_task(&self.db, id).await?)
    }

    async fn get_by_item_id(&self, item_id: Uuid) -> TaskResult<Option<Task>> {
        let Some(item) = task_item::Entity::find_by_id(item_id).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(Self::find_task(&self.db, item.task_id).await?)
    }

    async fn create(&self, input: NewTask) -> TaskResult<Task> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let task_id = Uuid::now_v7();
        let owner_id = input.owner_id;

        let txn = self.db.begin().await?;

        let model = task::ActiveModel {
            id: Set(task_id),
            owner_id: Set(owner_id),
            title: Set(input.title),
            date: Set(input.date),
            review: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_insert_error(e, owner_id))?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in input.items {
            let inserted = task_item::ActiveModel::from_new(task_id, item, now)
                .insert(&txn)
                .await?;
            items.push(TaskItem::from(inserted));
        }

        txn.commit().await?;

        Task::sort_items(&mut items);
        tracing::info!(task_id = %task_id, items = items.len(), "Created task");
        Ok(model.into_task(items))
    }

    async fn update(&self, id: Uuid, input: TaskReplacement) -> TaskResult<Task> {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let txn = self.db.begin().await?;

        let existing = task::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        if existing.owner_id != input.owner_id {
            tracing::warn!(task_id = %id, "Update rejected: caller is not the owner");
            return Err(TaskError::not_owner());
        }

        let mut active: task::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.date = Set(input.date);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let mut current: HashMap<Uuid, task_item::Model> = task_item::Entity::find()
            .filter(task_item::Column::TaskId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let supplied: HashSet<Uuid> = input.items.iter().map(|item| item.id).collect();
        let stale: Vec<Uuid> = current
            .keys()
            .filter(|item_id| !supplied.contains(item_id))
            .copied()
            .collect();

        let (mut updated, mut inserted) = (0usize, 0usize);
        for changes in input.items {
            match current.remove(&changes.id) {
                Some(model) => {
                    let mut item: task_item::ActiveModel = model.into();
                    item.apply_changes(changes, now);
                    item.update(&txn).await?;
                    updated += 1;
                }
                None => {
                    if task_item::Entity::find_by_id(changes.id)
                        .one(&txn)
                        .await?
                        .is_some()
                    {
                        return Err(TaskError::Validation(format!(
                            "Task item {} belongs to another task",
                            changes.id
                        )));
                    }
                    task_item::ActiveModel::from_changes(id, changes, now)
                        .insert(&txn)
                        .await?;
                    inserted += 1;
                }
            }
        }

        if !stale.is_empty() {
            task_item::Entity::delete_many()
                .filter(task_item::Column::Id.is_in(stale.clone()))
                .exec(&txn)
                .await?;
        }

        let task = Self::find_task(&txn, id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        txn.commit().await?;

        tracing::info!(
            task_id = %id,
            updated,
            inserted,
            deleted = stale.len(),
            "Updated task"
        );
        Ok(task)
    }

    async fn update_review(&self, id: Uuid, review: Option<String>) -> TaskResult<()> {
        let active = task::ActiveModel {
            id: Unchanged(id),
            review: Set(review),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match active.update(&self.db).await {
            Ok(_) => {
                tracing::info!(task_id = %id, "Updated task review");
                Ok(())
            }
            Err(err) if is_missing_row(&err) => Err(TaskError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_item_output(&self, item_id: Uuid, output: String) -> TaskResult<()> {
        let active = task_item::ActiveModel {
            id: Unchanged(item_id),
            output: Set(Some(output)),
            status: Set(TaskItemStatus::Completed),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        match active.update(&self.db).await {
            Ok(_) => {
                tracing::info!(task_item_id = %item_id, "Completed task item");
                Ok(())
            }
            Err(err) if is_missing_row(&err) => Err(TaskError::ItemNotFound(item_id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = task::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
