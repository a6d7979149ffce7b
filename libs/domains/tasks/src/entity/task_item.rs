use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{
    Density, DurationTime, NewTaskItem, Priority, TaskItem, TaskItemChanges, TaskItemStatus,
};

/// Sea-ORM Entity for the task_items table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "task_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub task_id: Uuid,
    pub priority: Priority,
    pub density: Density,
    pub duration_time: DurationTime,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub output: Option<String>,
    pub is_required: bool,
    pub order: i32,
    pub status: TaskItemStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::task::Entity",
        from = "Column::TaskId",
        to = "super::task::Column::Id",
        on_delete = "Cascade"
    )]
    Task,
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TaskItem {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            task_id: model.task_id,
            priority: model.priority,
            density: model.density,
            duration_time: model.duration_time,
            content: model.content,
            output: model.output,
            is_required: model.is_required,
            order: model.order,
            status: model.status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    /// A fresh item: generated id, `NotStarted`, no output
    pub fn from_new(task_id: Uuid, input: NewTaskItem, now: DateTimeWithTimeZone) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            task_id: Set(task_id),
            priority: Set(input.priority),
            density: Set(input.density),
            duration_time: Set(input.duration_time),
            content: Set(input.content),
            output: Set(None),
            is_required: Set(input.is_required),
            order: Set(input.order),
            status: Set(TaskItemStatus::NotStarted),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// An item supplied by an update whose id is not yet stored
    pub fn from_changes(task_id: Uuid, input: TaskItemChanges, now: DateTimeWithTimeZone) -> Self {
        ActiveModel {
            id: Set(input.id),
            task_id: Set(task_id),
            priority: Set(input.priority),
            density: Set(input.density),
            duration_time: Set(input.duration_time),
            content: Set(input.content),
            output: Set(None),
            is_required: Set(input.is_required),
            order: Set(input.order),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }

    /// Overwrite the editable fields, keeping id, output and created_at
    pub fn apply_changes(&mut self, input: TaskItemChanges, now: DateTimeWithTimeZone) {
        self.priority = Set(input.priority);
        self.density = Set(input.density);
        self.duration_time = Set(input.duration_time);
        self.content = Set(input.content);
        self.is_required = Set(input.is_required);
        self.order = Set(input.order);
        self.status = Set(input.status);
        self.updated_at = Set(now);
    }
}
