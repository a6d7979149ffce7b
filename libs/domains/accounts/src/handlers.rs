use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::{get, post},
};
use axum_helpers::{
    AccountIdHeader, AppError, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{AccountError, AccountResult};
use crate::models::{AccountByEmailQuery, AccountResponse, CreateOrGetAccountRequest};
use crate::repository::AccountRepository;
use crate::service::AccountService;

const TAG: &str = "accounts";

/// OpenAPI documentation for Accounts API
#[derive(OpenApi)]
#[openapi(
    paths(create_or_get_account, get_account_by_email, get_current_account, get_account),
    components(
        schemas(AccountResponse, CreateOrGetAccountRequest),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Account lookup and OAuth sign-in linkage")
    )
)]
pub struct AccountsApiDoc;

/// Create the accounts router with all HTTP endpoints
pub fn router<R: AccountRepository + 'static>(service: AccountService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/auth", post(create_or_get_account))
        .route("/by-email", get(get_account_by_email))
        .route("/me", get(get_current_account))
        .route("/{id}", get(get_account))
        .with_state(shared_service)
}

/// Create the account on first OAuth sign-in, or return the existing one
#[utoipa::path(
    post,
    path = "/auth",
    tag = TAG,
    request_body = CreateOrGetAccountRequest,
    responses(
        (status = 200, description = "Account for the given email", body = AccountResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_or_get_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateOrGetAccountRequest>,
) -> AccountResult<Json<AccountResponse>> {
    let account = service.create_or_get_account(input).await?;
    Ok(Json(account.into()))
}

/// Get an account by email
#[utoipa::path(
    get,
    path = "/by-email",
    tag = TAG,
    params(AccountByEmailQuery),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_account_by_email<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    query: Result<Query<AccountByEmailQuery>, QueryRejection>,
) -> Result<Json<AccountResponse>, AppError> {
    let Query(query) = query.map_err(|_| AccountError::Validation("Email is required".into()))?;
    if query.email.trim().is_empty() {
        return Err(AccountError::Validation("Email is required".into()).into());
    }

    let account = service
        .find_account_by_email(&query.email)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    Ok(Json(account.into()))
}

/// Get the account identified by the `x-account-id` header
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    params(
        ("x-account-id" = Uuid, Header, description = "Caller's account ID")
    ),
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_current_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    AccountIdHeader(account_id): AccountIdHeader,
) -> AccountResult<Json<AccountResponse>> {
    let account = service.get_current_account(account_id).await?;
    Ok(Json(account.into()))
}

/// Get an account by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account found", body = AccountResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_account<R: AccountRepository>(
    State(service): State<Arc<AccountService<R>>>,
    UuidPath(id): UuidPath,
) -> AccountResult<Json<AccountResponse>> {
    let account = service
        .find_account(id)
        .await?
        .ok_or(AccountError::NotFound(id))?;
    Ok(Json(account.into()))
}
