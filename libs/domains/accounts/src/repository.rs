use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AccountResult;
use crate::models::{Account, NewAccount};

/// Repository trait for Account persistence
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Fetch every account whose id is in `ids`; unknown ids are skipped
    async fn get_by_ids(&self, ids: Vec<Uuid>) -> AccountResult<Vec<Account>>;

    async fn get_by_id(&self, id: Uuid) -> AccountResult<Option<Account>>;

    async fn get_by_email(&self, email: &str) -> AccountResult<Option<Account>>;

    /// Insert a new account.
    ///
    /// Returns `Ok(None)` when the email or provider identity is already taken,
    /// so callers can re-read instead of failing.
    async fn create(&self, input: NewAccount) -> AccountResult<Option<Account>>;
}
