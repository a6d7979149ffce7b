use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(TaskPriority::Enum)
                    .values([TaskPriority::High, TaskPriority::Medium, TaskPriority::Low])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(TaskDensity::Enum)
                    .values([TaskDensity::High, TaskDensity::Medium, TaskDensity::Low])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(TaskItemStatus::Enum)
                    .values([
                        TaskItemStatus::NotStarted,
                        TaskItemStatus::InProgress,
                        TaskItemStatus::Completed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TaskItems::Table)
                    .if_not_exists()
                    .col(pk_uuid(TaskItems::Id))
                    .col(uuid(TaskItems::TaskId))
                    .col(
                        ColumnDef::new(TaskItems::Priority)
                            .enumeration(
                                TaskPriority::Enum,
                                [TaskPriority::High, TaskPriority::Medium, TaskPriority::Low],
                            )
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TaskItems::Density)
                            .enumeration(
                                TaskDensity::Enum,
                                [TaskDensity::High, TaskDensity::Medium, TaskDensity::Low],
                            )
                            .not_null(),
                    )
                    .col(integer(TaskItems::DurationTime))
                    .col(text(TaskItems::Content))
                    .col(text_null(TaskItems::Output))
                    .col(boolean(TaskItems::IsRequired).default(false))
                    .col(integer(TaskItems::Order))
                    .col(
                        ColumnDef::new(TaskItems::Status)
                            .enumeration(
                                TaskItemStatus::Enum,
                                [
                                    TaskItemStatus::NotStarted,
                                    TaskItemStatus::InProgress,
                                    TaskItemStatus::Completed,
                                ],
                            )
                            .not_null()
                            .default("NotStarted"),
                    )
                    .col(
                        timestamp_with_time_zone(TaskItems::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(TaskItems::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_items_task_id")
                            .from(TaskItems::Table, TaskItems::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_task_items_task_id_order")
                    .table(TaskItems::Table)
                    .col(TaskItems::TaskId)
                    .col(TaskItems::Order)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE task_items
                    ADD CONSTRAINT chk_task_items_order CHECK ("order" >= 0),
                    ADD CONSTRAINT chk_task_items_duration_time CHECK (duration_time IN (15, 30, 45, 60))
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskItems::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TaskItemStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TaskDensity::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(TaskPriority::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TaskItems {
    Table,
    Id,
    TaskId,
    Priority,
    Density,
    DurationTime,
    Content,
    Output,
    IsRequired,
    Order,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum TaskPriority {
    #[sea_orm(iden = "task_priority")]
    Enum,
    #[sea_orm(iden = "High")]
    High,
    #[sea_orm(iden = "Medium")]
    Medium,
    #[sea_orm(iden = "Low")]
    Low,
}

#[derive(DeriveIden)]
enum TaskDensity {
    #[sea_orm(iden = "task_density")]
    Enum,
    #[sea_orm(iden = "High")]
    High,
    #[sea_orm(iden = "Medium")]
    Medium,
    #[sea_orm(iden = "Low")]
    Low,
}

#[derive(DeriveIden)]
enum TaskItemStatus {
    #[sea_orm(iden = "task_item_status")]
    Enum,
    #[sea_orm(iden = "NotStarted")]
    NotStarted,
    #[sea_orm(iden = "InProgress")]
    InProgress,
    #[sea_orm(iden = "Completed")]
    Completed,
}
