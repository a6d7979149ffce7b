use utoipa::{Modify, OpenApi};

/// Tasks own top-level paths (`/tasks`, `/taskitems`), so their doc is merged
/// instead of nested under a prefix.
struct MergeTasksDoc;

impl Modify for MergeTasksDoc {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_tasks::TasksApiDoc::openapi());
    }
}

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Planner API",
        version = "0.1.0",
        description = "Daily task planning: accounts, tasks, task items and their statistics"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/accounts", api = domain_accounts::AccountsApiDoc)
    ),
    modifiers(&MergeTasksDoc)
)]
pub struct ApiDoc;
