use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use domain_accounts::{Account, AccountRepository};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{
    CreateTaskRequest, Task, TaskListCondition, UpdateReviewRequest, UpdateTaskItemOutputRequest,
    UpdateTaskRequest,
};
use crate::repository::TaskRepository;

/// A task together with its resolved owner, ready for presentation
#[derive(Debug, Clone, PartialEq)]
pub struct TaskWithOwner {
    pub task: Task,
    pub owner: Account,
}

/// Service layer for Task business logic.
///
/// Ownership is enforced here for delete, review and item output; the store
/// enforces it for the full update inside its transaction.
pub struct TaskService<R: TaskRepository, A: AccountRepository> {
    tasks: Arc<R>,
    accounts: Arc<A>,
}

impl<R: TaskRepository, A: AccountRepository> TaskService<R, A> {
    pub fn new(tasks: R, accounts: A) -> Self {
        Self {
            tasks: Arc::new(tasks),
            accounts: Arc::new(accounts),
        }
    }

    /// List tasks and resolve every owner. A task whose owner is missing is a
    /// consistency error, never silently dropped.
    #[instrument(skip(self, condition), fields(owner_id = ?condition.owner_id, sort = %condition.sort))]
    pub async fn list_tasks(&self, condition: TaskListCondition) -> TaskResult<Vec<TaskWithOwner>> {
        let tasks = self.tasks.list(condition).await?;
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let owner_ids: Vec<Uuid> = tasks
            .iter()
            .map(|task| task.owner_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let owners: HashMap<Uuid, Account> = self
            .accounts
            .get_by_ids(owner_ids)
            .await?
            .into_iter()
            .map(|account| (account.id, account))
            .collect();

        tasks
            .into_iter()
            .map(|task| {
                let owner = owners.get(&task.owner_id).cloned().ok_or_else(|| {
                    TaskError::Consistency(format!(
                        "owner {} of task {} not found",
                        task.owner_id, task.id
                    ))
                })?;
                Ok(TaskWithOwner { task, owner })
            })
            .collect()
    }

    /// Get a task; `None` when it does not exist
    #[instrument(skip(self), fields(task_id = %id))]
    pub async fn get_task(&self, id: Uuid) -> TaskResult<Option<TaskWithOwner>> {
        match self.tasks.get_by_id(id).await? {
            Some(task) => Ok(Some(self.with_owner(task).await?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, input), fields(owner_id = %input.owner_id))]
    pub async fn create_task(&self, input: CreateTaskRequest) -> TaskResult<TaskWithOwner> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let task = self.tasks.create(input.into_new_task()?).await?;
        self.with_owner(task).await
    }

    /// Replace a task's title, date and item set
    #[instrument(skip(self, input), fields(task_id = %id, owner_id = %input.owner_id))]
    pub async fn update_task(&self, id: Uuid, input: UpdateTaskRequest) -> TaskResult<TaskWithOwner> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = input.task_items.iter().find(|item| !seen.insert(item.id)) {
            return Err(TaskError::Validation(format!(
                "Task item {} appears more than once",
                duplicate.id
            )));
        }

        let task = self.tasks.update(id, input.into_replacement()?).await?;
        self.with_owner(task).await
    }

    #[instrument(skip(self), fields(task_id = %id, owner_id = %owner_id))]
    pub async fn delete_task(&self, id: Uuid, owner_id: Uuid) -> TaskResult<()> {
        let task = self.owned_task(id, owner_id).await?;

        if !self.tasks.delete(task.id).await? {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }

    /// Set or clear the review; an empty string clears it
    #[instrument(skip(self, input), fields(task_id = %id, owner_id = %input.owner_id))]
    pub async fn update_review(
        &self,
        id: Uuid,
        input: UpdateReviewRequest,
    ) -> TaskResult<TaskWithOwner> {
        self.owned_task(id, input.owner_id).await?;

        let review = input.review.filter(|review| !review.is_empty());
        self.tasks.update_review(id, review).await?;

        let task = self
            .tasks
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;
        self.with_owner(task).await
    }

    /// Record an item's output, which also completes it
    #[instrument(skip(self, input), fields(task_item_id = %item_id, owner_id = %input.owner_id))]
    pub async fn update_item_output(
        &self,
        item_id: Uuid,
        input: UpdateTaskItemOutputRequest,
    ) -> TaskResult<TaskWithOwner> {
        input
            .validate()
            .map_err(|e| TaskError::Validation(e.to_string()))?;

        let task = self
            .tasks
            .get_by_item_id(item_id)
            .await?
            .ok_or(TaskError::ItemNotFound(item_id))?;

        if task.owner_id != input.owner_id {
            return Err(TaskError::not_owner());
        }
        if !task.contains_item(item_id) {
            return Err(TaskError::ItemNotFound(item_id));
        }

        self.tasks.update_item_output(item_id, input.output).await?;

        let updated = self
            .tasks
            .get_by_id(task.id)
            .await?
            .ok_or(TaskError::NotFound(task.id))?;
        self.with_owner(updated).await
    }

    async fn owned_task(&self, id: Uuid, owner_id: Uuid) -> TaskResult<Task> {
        let task = self
            .tasks
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))?;

        if task.owner_id != owner_id {
            tracing::warn!(task_id = %id, "Caller is not the task owner");
            return Err(TaskError::not_owner());
        }

        Ok(task)
    }

    async fn with_owner(&self, task: Task) -> TaskResult<TaskWithOwner> {
        let owner = self
            .accounts
            .get_by_id(task.owner_id)
            .await?
            .ok_or_else(|| {
                TaskError::Consistency(format!(
                    "owner {} of task {} not found",
                    task.owner_id, task.id
                ))
            })?;

        Ok(TaskWithOwner { task, owner })
    }
}
