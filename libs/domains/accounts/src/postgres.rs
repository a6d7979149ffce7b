use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::AccountResult,
    models::{Account, NewAccount},
    repository::AccountRepository,
};

pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn get_by_ids(&self, ids: Vec<Uuid>) -> AccountResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> AccountResult<Option<Account>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, input: NewAccount) -> AccountResult<Option<Account>> {
        let active_model: entity::ActiveModel = input.into();

        match active_model.insert(&self.db).await {
            Ok(model) => {
                tracing::info!(account_id = %model.id, "Created account");
                Ok(Some(model.into()))
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                tracing::debug!(error = %err, "Account already exists");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
