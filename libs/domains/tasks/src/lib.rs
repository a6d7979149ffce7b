//! Tasks Domain
//!
//! A task is one day's plan for an account: a title, a calendar date, an
//! optional review and an ordered list of task items. Statistics (planned vs.
//! completed minutes, per-density shares) are derived on every read.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /tasks and /taskitems routes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← ownership checks, owner resolution
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access, item reconciliation in one transaction
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Presenter  │  ← Response shapes and statistics
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_accounts::PgAccountRepository;
//! use domain_tasks::{PgTaskRepository, TaskService, handlers};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = TaskService::new(
//!     PgTaskRepository::new(db.clone()),
//!     PgAccountRepository::new(db),
//! );
//! let routes = axum::Router::new().merge(handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod presenter;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use handlers::TasksApiDoc;
pub use models::{
    CreateTaskItemRequest, CreateTaskRequest, Density, DurationTime, Priority, Task, TaskItem,
    TaskItemStatus, TaskListCondition, TaskSort, UpdateTaskItemRequest, UpdateTaskRequest,
    YearMonth,
};
pub use postgres::PgTaskRepository;
pub use presenter::{TaskItemResponse, TaskResponse};
pub use repository::TaskRepository;
pub use service::{TaskService, TaskWithOwner};
