//! # Axum Helpers
//!
//! Shared HTTP plumbing for the planner services.
//!
//! - **[`server`]**: router assembly with OpenAPI docs, health/readiness, graceful shutdown
//! - **[`http`]**: CORS and security header middleware
//! - **[`errors`]**: [`AppError`] and the uniform [`ErrorResponse`] body
//! - **[`extractors`]**: UUID path, validated JSON and `x-account-id` header extractors
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.http)?
//!     .merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{AccountIdHeader, UuidPath, ValidatedJson};
pub use http::{create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};
