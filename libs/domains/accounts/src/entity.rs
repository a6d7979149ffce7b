use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Account, NewAccount};

/// Sea-ORM Entity for the accounts table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub provider: String,
    pub provider_account_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail: Option<String>,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            is_active: model.is_active,
            provider: model.provider,
            provider_account_id: model.provider_account_id,
            thumbnail: model.thumbnail,
            last_login_at: model.last_login_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<NewAccount> for ActiveModel {
    fn from(input: NewAccount) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            is_active: Set(true),
            provider: Set(input.provider),
            provider_account_id: Set(input.provider_account_id),
            thumbnail: Set(input.thumbnail),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
