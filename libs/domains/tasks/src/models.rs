use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::TaskError;

/// Calendar date format used on the wire
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task item priority
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_priority")]
pub enum Priority {
    #[sea_orm(string_value = "High")]
    High,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

/// Workload intensity of a task item, independent of priority
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_density")]
pub enum Density {
    #[sea_orm(string_value = "High")]
    High,
    #[default]
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "Low")]
    Low,
}

/// Task item progress.
///
/// Only the item-output operation forces `Completed`; the bulk update may set
/// any value, including moving backwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_item_status")]
pub enum TaskItemStatus {
    #[default]
    #[sea_orm(string_value = "NotStarted")]
    NotStarted,
    #[sea_orm(string_value = "InProgress")]
    InProgress,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

/// Planned duration of a task item, in minutes. Serialized as the bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DeriveActiveEnum, EnumIter)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum DurationTime {
    #[sea_orm(num_value = 15)]
    Minutes15,
    #[sea_orm(num_value = 30)]
    Minutes30,
    #[sea_orm(num_value = 45)]
    Minutes45,
    #[sea_orm(num_value = 60)]
    Minutes60,
}

impl DurationTime {
    pub fn minutes(self) -> i32 {
        match self {
            DurationTime::Minutes15 => 15,
            DurationTime::Minutes30 => 30,
            DurationTime::Minutes45 => 45,
            DurationTime::Minutes60 => 60,
        }
    }
}

impl From<DurationTime> for i32 {
    fn from(value: DurationTime) -> Self {
        value.minutes()
    }
}

impl TryFrom<i32> for DurationTime {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            15 => Ok(DurationTime::Minutes15),
            30 => Ok(DurationTime::Minutes30),
            45 => Ok(DurationTime::Minutes45),
            60 => Ok(DurationTime::Minutes60),
            other => Err(format!(
                "durationTime must be one of 15, 30, 45, 60 (got {})",
                other
            )),
        }
    }
}

/// Task item - a unit of planned work inside a task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskItem {
    pub id: Uuid,
    pub task_id: Uuid,
    pub priority: Priority,
    pub density: Density,
    pub duration_time: DurationTime,
    pub content: String,
    /// Set only when the item is completed through the output operation
    pub output: Option<String>,
    pub is_required: bool,
    pub order: i32,
    pub status: TaskItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root. Items are always loaded and written together with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub review: Option<String>,
    pub items: Vec<TaskItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Display order: `order`, then creation time, then id.
    pub fn sort_items(items: &mut [TaskItem]) {
        items.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
    }

    pub fn contains_item(&self, item_id: Uuid) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_items(&self.items)
    }
}

/// Count and total minutes of a set of items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemTally {
    pub count: i32,
    pub minutes: i32,
}

impl ItemTally {
    fn add(&mut self, item: &TaskItem) {
        self.count += 1;
        self.minutes += item.duration_time.minutes();
    }
}

/// Derived per-task statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub planned: ItemTally,
    pub completed: ItemTally,
    pub high: ItemTally,
    pub medium: ItemTally,
    pub low: ItemTally,
}

impl TaskStats {
    pub fn from_items(items: &[TaskItem]) -> Self {
        let mut stats = Self::default();
        for item in items {
            stats.planned.add(item);
            if item.status == TaskItemStatus::Completed {
                stats.completed.add(item);
            }
            match item.density {
                Density::High => stats.high.add(item),
                Density::Medium => stats.medium.add(item),
                Density::Low => stats.low.add(item),
            }
        }
        stats
    }

    /// Completed items over planned items, as a percentage. 0 for an empty task.
    pub fn completion_rate(&self) -> f64 {
        percentage(self.completed.count, self.planned.count)
    }

    /// Share of the planned minutes that falls in `bucket`, as a percentage.
    pub fn duration_share(&self, bucket: ItemTally) -> f64 {
        percentage(bucket.minutes, self.planned.minutes)
    }
}

fn percentage(part: i32, whole: i32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// Input for the store's `create`. Items always start `NotStarted` with no output.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub items: Vec<NewTaskItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskItem {
    pub priority: Priority,
    pub density: Density,
    pub duration_time: DurationTime,
    pub content: String,
    pub is_required: bool,
    pub order: i32,
}

/// Input for the store's `update`: the full new state of the task's scalars and items
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReplacement {
    pub owner_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub items: Vec<TaskItemChanges>,
}

/// One item of a replacement. `id` either names an existing item of the task
/// (updated in place) or is a new id (inserted).
#[derive(Debug, Clone, PartialEq)]
pub struct TaskItemChanges {
    pub id: Uuid,
    pub priority: Priority,
    pub density: Density,
    pub duration_time: DurationTime,
    pub content: String,
    pub is_required: bool,
    pub order: i32,
    pub status: TaskItemStatus,
}

/// A month, parsed from `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    first_day: NaiveDate,
}

impl YearMonth {
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl FromStr for YearMonth {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaskError::Validation(format!("Invalid year-month '{}', expected YYYY-MM", s));

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        Ok(Self { first_day })
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.first_day.year(), self.first_day.month())
    }
}

/// List ordering. The completion and quantity orderings are applied after
/// loading, on top of the newest-first order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum TaskSort {
    /// Creation time, newest first
    #[default]
    Newest,
    Oldest,
    DateAsc,
    DateDesc,
    /// Completion rate, highest first
    HighestCompletion,
    LowestCompletion,
    /// Completed minutes, most first
    MostQuantity,
    LeastQuantity,
}

impl TaskSort {
    /// Stable re-sort for the derived orderings; no-op for the others.
    pub fn apply_derived(&self, tasks: &mut [Task]) {
        match self {
            TaskSort::HighestCompletion => tasks.sort_by(|a, b| {
                b.stats()
                    .completion_rate()
                    .total_cmp(&a.stats().completion_rate())
            }),
            TaskSort::LowestCompletion => tasks.sort_by(|a, b| {
                a.stats()
                    .completion_rate()
                    .total_cmp(&b.stats().completion_rate())
            }),
            TaskSort::MostQuantity => {
                tasks.sort_by_key(|t| std::cmp::Reverse(t.stats().completed.minutes))
            }
            TaskSort::LeastQuantity => tasks.sort_by_key(|t| t.stats().completed.minutes),
            TaskSort::Newest | TaskSort::Oldest | TaskSort::DateAsc | TaskSort::DateDesc => {}
        }
    }
}

/// Filters for the store's `list`; every supplied filter must match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListCondition {
    pub owner_id: Option<Uuid>,
    pub year_month: Option<YearMonth>,
    /// Case-insensitive substring of the title or of any item's content
    pub keyword: Option<String>,
    pub sort: TaskSort,
}

/// Query string of `GET /tasks`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// Only tasks owned by this account
    #[serde(rename = "ownerId")]
    pub owner_id: Option<Uuid>,
    /// Calendar month of the task date, `YYYY-MM`
    #[serde(rename = "year-month")]
    pub year_month: Option<String>,
    /// Keyword matched against titles and item contents
    pub q: Option<String>,
    /// newest | oldest | date-asc | date-desc | highest-completion |
    /// lowest-completion | most-quantity | least-quantity
    pub sort: Option<String>,
}

impl TryFrom<ListTasksQuery> for TaskListCondition {
    type Error = TaskError;

    fn try_from(query: ListTasksQuery) -> Result<Self, Self::Error> {
        let year_month = non_blank(query.year_month)
            .map(|ym| ym.parse::<YearMonth>())
            .transpose()?;
        let sort = non_blank(query.sort)
            .map(|s| {
                s.parse::<TaskSort>()
                    .map_err(|_| TaskError::Validation(format!("Unknown sort '{}'", s)))
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            owner_id: query.owner_id,
            year_month,
            keyword: non_blank(query.q),
            sort,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a zero-padded `YYYY-MM-DD` date. chrono alone also accepts `2024-3-5`,
/// so the input must equal the re-rendered date.
fn parse_strict_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .ok()
        .filter(|parsed| parsed.format(DATE_FORMAT).to_string() == date)
}

/// Validator for `YYYY-MM-DD` date strings
pub fn validate_date(date: &str) -> Result<(), ValidationError> {
    parse_strict_date(date)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date").with_message("date must be YYYY-MM-DD".into()))
}

pub fn parse_date(date: &str) -> Result<NaiveDate, TaskError> {
    parse_strict_date(date)
        .ok_or_else(|| TaskError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
}

/// Body of `POST /tasks`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[ts(as = "String")]
    pub owner_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(length(min = 1), nested)]
    pub task_items: Vec<CreateTaskItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskItemRequest {
    pub priority: Priority,
    pub density: Density,
    #[schema(value_type = i32, example = 30)]
    #[ts(type = "15 | 30 | 45 | 60")]
    pub duration_time: DurationTime,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub is_required: bool,
    #[validate(range(min = 0))]
    pub order: i32,
    /// Accepted but ignored: new items always start `NotStarted`
    pub status: Option<TaskItemStatus>,
}

impl CreateTaskRequest {
    pub fn into_new_task(self) -> Result<NewTask, TaskError> {
        Ok(NewTask {
            date: parse_date(&self.date)?,
            owner_id: self.owner_id,
            title: self.title,
            items: self
                .task_items
                .into_iter()
                .map(|item| NewTaskItem {
                    priority: item.priority,
                    density: item.density,
                    duration_time: item.duration_time,
                    content: item.content,
                    is_required: item.is_required,
                    order: item.order,
                })
                .collect(),
        })
    }
}

/// Body of `PUT /tasks/{id}`: the complete new item set
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[ts(as = "String")]
    pub owner_id: Uuid,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    #[validate(length(min = 1), nested)]
    pub task_items: Vec<UpdateTaskItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskItemRequest {
    /// Existing item id to update, or a new id to insert
    #[ts(as = "String")]
    pub id: Uuid,
    pub priority: Priority,
    pub density: Density,
    #[schema(value_type = i32, example = 30)]
    #[ts(type = "15 | 30 | 45 | 60")]
    pub duration_time: DurationTime,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    pub is_required: bool,
    #[validate(range(min = 0))]
    pub order: i32,
    pub status: TaskItemStatus,
}

impl UpdateTaskRequest {
    pub fn into_replacement(self) -> Result<TaskReplacement, TaskError> {
        Ok(TaskReplacement {
            date: parse_date(&self.date)?,
            owner_id: self.owner_id,
            title: self.title,
            items: self
                .task_items
                .into_iter()
                .map(|item| TaskItemChanges {
                    id: item.id,
                    priority: item.priority,
                    density: item.density,
                    duration_time: item.duration_time,
                    content: item.content,
                    is_required: item.is_required,
                    order: item.order,
                    status: item.status,
                })
                .collect(),
        })
    }
}

/// Body of `PUT /tasks/{id}/review`. `null` or `""` clears the review.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[ts(as = "String")]
    pub owner_id: Uuid,
    #[serde(default)]
    pub review: Option<String>,
}

/// Body of `PUT /taskitems/{id}`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskItemOutputRequest {
    #[ts(as = "String")]
    pub owner_id: Uuid,
    #[validate(length(min = 1))]
    pub output: String,
}

/// Body of `DELETE /tasks/{id}`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    #[ts(as = "String")]
    pub owner_id: Uuid,
}
