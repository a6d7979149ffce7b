//! `x-account-id` header extractor.

use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

pub const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Account id the caller identifies as, read from the `x-account-id` header.
///
/// Missing or malformed values are rejected with 400.
pub struct AccountIdHeader(pub Uuid);

impl<S> FromRequestParts<S> for AccountIdHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {} header", ACCOUNT_ID_HEADER)))?;

        let raw = value
            .to_str()
            .map_err(|_| AppError::BadRequest(format!("Invalid {} header", ACCOUNT_ID_HEADER)))?;

        Uuid::parse_str(raw.trim())
            .map(AccountIdHeader)
            .map_err(|_| AppError::BadRequest(format!("Invalid UUID: {}", raw)))
    }
}
