use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, CreateOrGetAccountRequest};
use crate::repository::AccountRepository;

/// Service layer for Account business logic
#[derive(Clone)]
pub struct AccountService<R: AccountRepository> {
    repository: Arc<R>,
}

impl<R: AccountRepository> AccountService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// The account behind the caller's identity; absence is an error
    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn get_current_account(&self, id: Uuid) -> AccountResult<Account> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    #[instrument(skip(self), fields(account_id = %id))]
    pub async fn find_account(&self, id: Uuid) -> AccountResult<Option<Account>> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_account_by_email(&self, email: &str) -> AccountResult<Option<Account>> {
        self.repository.get_by_email(email).await
    }

    /// Return the account registered under the request's email, creating it on first sign-in
    #[instrument(skip(self, input), fields(provider = %input.provider))]
    pub async fn create_or_get_account(
        &self,
        input: CreateOrGetAccountRequest,
    ) -> AccountResult<Account> {
        input
            .validate()
            .map_err(|e| AccountError::Validation(e.to_string()))?;

        if let Some(existing) = self.repository.get_by_email(&input.email).await? {
            return Ok(existing);
        }

        let email = input.email.clone();
        if let Some(created) = self.repository.create(input.into_new_account()).await? {
            return Ok(created);
        }

        // Lost a concurrent sign-up race; the winner's row is now visible
        self.repository.get_by_email(&email).await?.ok_or_else(|| {
            AccountError::Validation(
                "Provider account is already linked to a different email".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockAccountRepository;
    use chrono::Utc;
    use mockall::predicate::*;

    fn account(email: &str) -> Account {
        Account {
            id: Uuid::now_v7(),
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            is_active: true,
            provider: "google".to_string(),
            provider_account_id: "g-1".to_string(),
            thumbnail: None,
            last_login_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(email: &str) -> CreateOrGetAccountRequest {
        CreateOrGetAccountRequest {
            email: email.to_string(),
            name: "Ada Lovelace".to_string(),
            provider: "google".to_string(),
            provider_account_id: "g-1".to_string(),
            thumbnail: None,
        }
    }

    #[tokio::test]
    async fn test_get_current_account_missing_is_error() {
        let id = Uuid::now_v7();
        let mut mock_repo = MockAccountRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(None));

        let service = AccountService::new(mock_repo);
        let result = service.get_current_account(id).await;

        assert!(matches!(result, Err(AccountError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_find_account_missing_is_none() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = AccountService::new(mock_repo);
        let result = service.find_account(Uuid::now_v7()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_or_get_returns_existing() {
        let existing = account("ada@example.com");
        let expected_id = existing.id;

        let mut mock_repo = MockAccountRepository::new();
        mock_repo
            .expect_get_by_email()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_create().never();

        let service = AccountService::new(mock_repo);
        let result = service
            .create_or_get_account(request("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(result.id, expected_id);
    }

    #[tokio::test]
    async fn test_create_or_get_creates_with_split_name() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_get_by_email().times(1).returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|input| input.first_name == "Ada" && input.last_name == "Lovelace")
            .times(1)
            .returning(|input| {
                let mut created = account(&input.email);
                created.first_name = input.first_name;
                created.last_name = input.last_name;
                Ok(Some(created))
            });

        let service = AccountService::new(mock_repo);
        let result = service
            .create_or_get_account(request("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(result.email, "ada@example.com");
        assert_eq!(result.full_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_create_or_get_rereads_after_unique_race() {
        let winner = account("ada@example.com");
        let winner_id = winner.id;

        let mut seq = mockall::Sequence::new();
        let mut mock_repo = MockAccountRepository::new();
        mock_repo
            .expect_get_by_email()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        mock_repo
            .expect_get_by_email()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = AccountService::new(mock_repo);
        let result = service
            .create_or_get_account(request("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(result.id, winner_id);
    }

    #[tokio::test]
    async fn test_create_or_get_validation_error() {
        let mut mock_repo = MockAccountRepository::new();
        mock_repo.expect_get_by_email().never();
        mock_repo.expect_create().never();

        let service = AccountService::new(mock_repo);
        let result = service.create_or_get_account(request("nope")).await;

        assert!(matches!(result, Err(AccountError::Validation(_))));
    }
}
