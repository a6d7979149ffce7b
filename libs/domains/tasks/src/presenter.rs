//! Response shapes for tasks, including the derived statistics.

use domain_accounts::Account;
use domain_accounts::models::format_timestamp;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DATE_FORMAT, Density, Priority, TaskItem, TaskItemStatus};
use crate::service::TaskWithOwner;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskOwnerResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskItemResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub task_id: Uuid,
    pub priority: Priority,
    pub density: Density,
    /// Minutes: 15, 30, 45 or 60
    pub duration_time: i32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub is_required: bool,
    pub order: i32,
    pub status: TaskItemStatus,
}

/// Task as rendered to clients.
///
/// Rates are percentages in `[0, 100]`; all of them are 0 for a task without
/// items instead of a division error.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub owner_id: Uuid,
    pub owner: TaskOwnerResponse,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    pub task_items: Vec<TaskItemResponse>,
    pub planned_task_count: i32,
    pub planned_task_duration_minutes: i32,
    pub completed_task_count: i32,
    pub completed_task_duration_minutes: i32,
    pub completion_rate: f64,
    pub high_task_count: i32,
    pub high_task_duration: i32,
    pub high_task_rate: f64,
    pub medium_task_count: i32,
    pub medium_task_duration: i32,
    pub medium_task_rate: f64,
    pub low_task_count: i32,
    pub low_task_duration: i32,
    pub low_task_rate: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of a successful delete
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct DeleteTaskResponse {
    pub success: bool,
}

impl From<&Account> for TaskOwnerResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            thumbnail: account.thumbnail.clone(),
        }
    }
}

impl From<TaskItem> for TaskItemResponse {
    fn from(item: TaskItem) -> Self {
        Self {
            id: item.id,
            task_id: item.task_id,
            priority: item.priority,
            density: item.density,
            duration_time: item.duration_time.minutes(),
            content: item.content,
            output: item.output,
            is_required: item.is_required,
            order: item.order,
            status: item.status,
        }
    }
}

impl From<TaskWithOwner> for TaskResponse {
    fn from(TaskWithOwner { task, owner }: TaskWithOwner) -> Self {
        let stats = task.stats();

        Self {
            id: task.id,
            owner_id: task.owner_id,
            owner: TaskOwnerResponse::from(&owner),
            title: task.title,
            date: task.date.format(DATE_FORMAT).to_string(),
            review: task.review,
            task_items: task.items.into_iter().map(Into::into).collect(),
            planned_task_count: stats.planned.count,
            planned_task_duration_minutes: stats.planned.minutes,
            completed_task_count: stats.completed.count,
            completed_task_duration_minutes: stats.completed.minutes,
            completion_rate: stats.completion_rate(),
            high_task_count: stats.high.count,
            high_task_duration: stats.high.minutes,
            high_task_rate: stats.duration_share(stats.high),
            medium_task_count: stats.medium.count,
            medium_task_duration: stats.medium.minutes,
            medium_task_rate: stats.duration_share(stats.medium),
            low_task_count: stats.low.count,
            low_task_duration: stats.low.minutes,
            low_task_rate: stats.duration_share(stats.low),
            created_at: format_timestamp(&task.created_at),
            updated_at: format_timestamp(&task.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DurationTime, Task};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn owner() -> Account {
        Account {
            id: Uuid::now_v7(),
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_active: true,
            provider: "google".to_string(),
            provider_account_id: "g-1".to_string(),
            thumbnail: Some("https://example.com/ada.png".to_string()),
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(density: Density, duration: DurationTime, status: TaskItemStatus) -> TaskItem {
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        TaskItem {
            id: Uuid::now_v7(),
            task_id: Uuid::nil(),
            priority: Priority::Low,
            density,
            duration_time: duration,
            content: "Read".to_string(),
            output: (status == TaskItemStatus::Completed).then(|| "Notes".to_string()),
            is_required: false,
            order: 0,
            status,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn present(items: Vec<TaskItem>) -> TaskResponse {
        let owner = owner();
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        let task = Task {
            id: Uuid::now_v7(),
            owner_id: owner.id,
            title: "Study".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            review: None,
            items,
            created_at: ts,
            updated_at: ts,
        };
        TaskWithOwner { task, owner }.into()
    }

    #[test]
    fn empty_task_has_zero_rates() {
        let response = present(vec![]);

        assert_eq!(response.planned_task_count, 0);
        assert_eq!(response.completion_rate, 0.0);
        assert_eq!(response.high_task_rate, 0.0);
        assert_eq!(response.low_task_rate, 0.0);
    }

    #[test]
    fn aggregates_over_items() {
        let response = present(vec![
            item(Density::High, DurationTime::Minutes30, TaskItemStatus::Completed),
            item(Density::High, DurationTime::Minutes30, TaskItemStatus::NotStarted),
            item(Density::Low, DurationTime::Minutes60, TaskItemStatus::Completed),
            item(Density::Medium, DurationTime::Minutes15, TaskItemStatus::InProgress),
        ]);

        assert_eq!(response.planned_task_count, 4);
        assert_eq!(response.planned_task_duration_minutes, 135);
        assert_eq!(response.completed_task_count, 2);
        assert_eq!(response.completed_task_duration_minutes, 90);
        assert_eq!(response.completion_rate, 50.0);
        assert_eq!(response.high_task_count, 2);
        assert_eq!(response.high_task_duration, 60);
        assert!((response.high_task_rate - 44.444).abs() < 0.01);
        assert_eq!(response.medium_task_duration, 15);
        assert!((response.low_task_rate - 44.444).abs() < 0.01);
    }

    #[test]
    fn renders_wire_formats() {
        let response = present(vec![item(
            Density::Low,
            DurationTime::Minutes45,
            TaskItemStatus::NotStarted,
        )]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["date"], "2024-01-09");
        assert_eq!(json["createdAt"], "2024-01-10T08:00:00Z");
        assert_eq!(json["owner"]["firstName"], "Ada");
        assert_eq!(json["owner"]["thumbnail"], "https://example.com/ada.png");
        assert_eq!(json["taskItems"][0]["durationTime"], 45);
        assert_eq!(json["taskItems"][0]["status"], "NotStarted");
        assert_eq!(json["taskItems"][0]["density"], "Low");
        assert!(json.get("review").is_none());
        assert!(json["taskItems"][0].get("output").is_none());
    }
}
