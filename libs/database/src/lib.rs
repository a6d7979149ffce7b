//! Connection management for the planner's PostgreSQL store.
//!
//! # Features
//!
//! - `postgres` (default): pool configuration, connect-with-retry, migrations, health checks
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`]
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use database::common::RetryConfig;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, Some(RetryConfig::new())).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "planner_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
