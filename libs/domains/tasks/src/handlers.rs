use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use domain_accounts::AccountRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{TaskError, TaskResult};
use crate::models::{
    CreateTaskItemRequest, CreateTaskRequest, DeleteTaskRequest, Density, ListTasksQuery,
    Priority, TaskItemStatus, TaskListCondition, UpdateReviewRequest, UpdateTaskItemOutputRequest,
    UpdateTaskItemRequest, UpdateTaskRequest,
};
use crate::presenter::{DeleteTaskResponse, TaskItemResponse, TaskOwnerResponse, TaskResponse};
use crate::repository::TaskRepository;
use crate::service::TaskService;

const TAG: &str = "tasks";

type SharedService<R, A> = Arc<TaskService<R, A>>;

/// OpenAPI documentation for Tasks API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_tasks,
        create_task,
        get_task,
        update_task,
        delete_task,
        update_review,
        update_item_output,
    ),
    components(
        schemas(
            TaskResponse,
            TaskItemResponse,
            TaskOwnerResponse,
            DeleteTaskResponse,
            CreateTaskRequest,
            CreateTaskItemRequest,
            UpdateTaskRequest,
            UpdateTaskItemRequest,
            UpdateReviewRequest,
            UpdateTaskItemOutputRequest,
            DeleteTaskRequest,
            Priority,
            Density,
            TaskItemStatus,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Tasks and their items")
    )
)]
pub struct TasksApiDoc;

/// Create the task router with all HTTP endpoints.
///
/// Paths are absolute (`/tasks`, `/taskitems`) so the router is merged, not nested.
pub fn router<R, A>(service: TaskService<R, A>) -> Router
where
    R: TaskRepository + 'static,
    A: AccountRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/review", put(update_review))
        .route("/taskitems/{id}", put(update_item_output))
        .with_state(shared_service)
}

/// List tasks with optional filters
#[utoipa::path(
    get,
    path = "/tasks",
    tag = TAG,
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Matching tasks, possibly empty", body = Vec<TaskResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_tasks<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> TaskResult<Json<Vec<TaskResponse>>> {
    let Query(query) = query.map_err(|e| TaskError::Validation(e.body_text()))?;
    let condition = TaskListCondition::try_from(query)?;

    let tasks = service.list_tasks(condition).await?;
    Ok(Json(tasks.into_iter().map(Into::into).collect()))
}

/// Create a task with its items
#[utoipa::path(
    post,
    path = "/tasks",
    tag = TAG,
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_task<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_task<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.get_task(id).await?.ok_or(TaskError::NotFound(id))?;
    Ok(Json(task.into()))
}

/// Replace a task's title, date and items
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_task<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTaskRequest>,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.update_task(id, input).await?;
    Ok(Json(task.into()))
}

/// Delete a task and its items
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = DeleteTaskRequest,
    responses(
        (status = 200, description = "Task deleted", body = DeleteTaskResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_task<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<DeleteTaskRequest>,
) -> TaskResult<Json<DeleteTaskResponse>> {
    service.delete_task(id, input.owner_id).await?;
    Ok(Json(DeleteTaskResponse { success: true }))
}

/// Set or clear a task's review
#[utoipa::path(
    put,
    path = "/tasks/{id}/review",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task ID")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = TaskResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_review<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateReviewRequest>,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.update_review(id, input).await?;
    Ok(Json(task.into()))
}

/// Record a task item's output and mark it completed
#[utoipa::path(
    put,
    path = "/taskitems/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Task item ID")
    ),
    request_body = UpdateTaskItemOutputRequest,
    responses(
        (status = 200, description = "Owning task after the update", body = TaskResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_item_output<R: TaskRepository, A: AccountRepository>(
    State(service): State<SharedService<R, A>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTaskItemOutputRequest>,
) -> TaskResult<Json<TaskResponse>> {
    let task = service.update_item_output(id, input).await?;
    Ok(Json(task.into()))
}
