use sea_orm::entity::prelude::*;

use crate::models::{Task, TaskItem};

/// Sea-ORM Entity for the tasks table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub review: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task_item::Entity")]
    TaskItems,
}

impl Related<super::task_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Attach `items` (already in display order) to build the aggregate
    pub fn into_task(self, items: Vec<TaskItem>) -> Task {
        Task {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            date: self.date,
            review: self.review,
            items,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }
}
