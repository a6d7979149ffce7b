//! Accounts Domain
//!
//! Accounts are created once, when a user first signs in through an OAuth
//! provider, and are read-only afterwards. Tasks reference them by `owner_id`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /accounts routes, request/response mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← create-or-get, lookups
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres implementation)
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_accounts::{AccountService, PgAccountRepository, handlers};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = AccountService::new(PgAccountRepository::new(db));
//! let routes = axum::Router::new().nest("/accounts", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AccountError, AccountResult};
pub use handlers::AccountsApiDoc;
pub use models::{Account, AccountResponse, CreateOrGetAccountRequest, NewAccount};
pub use postgres::PgAccountRepository;
pub use repository::AccountRepository;
#[cfg(any(test, feature = "mock"))]
pub use repository::MockAccountRepository;
pub use service::AccountService;
