//! Shared application state passed to the route builders and the readiness check.

/// Cloned per router; the connection pool is internally reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
