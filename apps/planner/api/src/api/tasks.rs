use axum::Router;
use domain_accounts::PgAccountRepository;
use domain_tasks::{PgTaskRepository, TaskService, handlers};

pub fn router(state: &crate::state::AppState) -> Router {
    let tasks = PgTaskRepository::new(state.db.clone());
    let accounts = PgAccountRepository::new(state.db.clone());
    handlers::router(TaskService::new(tasks, accounts))
}
