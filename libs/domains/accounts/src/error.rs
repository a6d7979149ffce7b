use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(msg) => AppError::BadRequest(msg),
            AccountError::NotFound(_) => AppError::NotFound("Account not found".to_string()),
            AccountError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        AccountError::Database(err.to_string())
    }
}
