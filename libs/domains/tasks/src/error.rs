use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_accounts::AccountError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    NotFound(Uuid),

    #[error("Task item not found: {0}")]
    ItemNotFound(Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Stored data violates a cross-aggregate invariant, e.g. a task whose owner is gone
    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type TaskResult<T> = Result<T, TaskError>;

impl TaskError {
    pub fn not_owner() -> Self {
        TaskError::Forbidden("You do not have permission to modify this task".to_string())
    }
}

/// Convert TaskError to AppError for standardized error responses
impl From<TaskError> for AppError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::Validation(msg) => AppError::BadRequest(msg),
            TaskError::NotFound(id) => AppError::NotFound(format!("Task {} not found", id)),
            TaskError::ItemNotFound(id) => {
                AppError::NotFound(format!("Task item {} not found", id))
            }
            TaskError::Forbidden(msg) => AppError::Forbidden(msg),
            TaskError::Consistency(msg) => {
                AppError::InternalServerError(format!("Consistency error: {}", msg))
            }
            TaskError::Database(msg) => {
                AppError::InternalServerError(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for TaskError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for TaskError {
    fn from(err: sea_orm::DbErr) -> Self {
        TaskError::Database(err.to_string())
    }
}

impl From<AccountError> for TaskError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Database(msg) => TaskError::Database(msg),
            other => TaskError::Consistency(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn status_is_chosen_by_variant() {
        let id = Uuid::nil();
        let cases = [
            (TaskError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (TaskError::NotFound(id), StatusCode::NOT_FOUND),
            (TaskError::ItemNotFound(id), StatusCode::NOT_FOUND),
            (TaskError::not_owner(), StatusCode::FORBIDDEN),
            (TaskError::Consistency("orphan".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (TaskError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn account_database_errors_stay_database_errors() {
        let err: TaskError = AccountError::Database("timeout".into()).into();
        assert!(matches!(err, TaskError::Database(msg) if msg == "timeout"));
    }
}
