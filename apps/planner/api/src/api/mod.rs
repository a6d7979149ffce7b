use axum::Router;

pub mod accounts;
pub mod health;
pub mod tasks;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by `create_router`.
///
/// Tasks own two top-level paths (`/tasks`, `/taskitems`), so their router is merged.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/accounts", accounts::router(state))
        .merge(tasks::router(state))
}

/// Router with the /ready endpoint; merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
