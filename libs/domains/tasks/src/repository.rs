use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{NewTask, Task, TaskListCondition, TaskReplacement};

/// Repository trait for the Task aggregate.
///
/// Every returned `Task` carries its full item collection in display order.
/// Multi-row writes are atomic: on error nothing is visible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Tasks matching every filter in `condition`, ordered by `condition.sort`
    async fn list(&self, condition: TaskListCondition) -> TaskResult<Vec<Task>>;

    async fn get_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    /// The task that owns the item `item_id`
    async fn get_by_item_id(&self, item_id: Uuid) -> TaskResult<Option<Task>>;

    /// Insert the task and all of its items in one transaction
    async fn create(&self, input: NewTask) -> TaskResult<Task>;

    /// Replace scalars and reconcile items in one transaction.
    ///
    /// Fails with `Forbidden` and writes nothing when `input.owner_id` is not
    /// the task's owner.
    async fn update(&self, id: Uuid, input: TaskReplacement) -> TaskResult<Task>;

    /// Set or clear the review. No ownership check.
    async fn update_review(&self, id: Uuid, review: Option<String>) -> TaskResult<()>;

    /// Set the item's output and mark it `Completed`. No ownership check.
    async fn update_item_output(&self, item_id: Uuid, output: String) -> TaskResult<()>;

    /// Delete a task; its items go with it. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}
