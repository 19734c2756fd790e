use crate::domain::models::TaskPayload;
use crate::presentation::handlers::{ApiError, AppState, MessageResponse};
use crate::presentation::middleware::AuthenticatedLogin;
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};

#[instrument(skip(state, principal), fields(principal = %principal.email, login_id = principal.login_id))]
pub async fn list_tasks(
    state: web::Data<AppState>,
    principal: AuthenticatedLogin,
) -> Result<HttpResponse, ApiError> {
    let tasks = state.task_service.list_tasks().await?;
    info!(count = tasks.len(), "Tasks listed");
    Ok(HttpResponse::Ok().json(tasks))
}

#[instrument(skip(state), fields(task_id = %*path))]
pub async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let task = state.task_service.get_task(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, principal, req), fields(principal = %principal.email, login_id = principal.login_id, task_id))]
pub async fn create_task(
    state: web::Data<AppState>,
    principal: AuthenticatedLogin,
    req: web::Json<TaskPayload>,
) -> Result<HttpResponse, ApiError> {
    let task = state
        .task_service
        .create_task(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create task");
            ApiError::from(e)
        })?;
    tracing::Span::current().record("task_id", task.task_id);
    info!(task_id = task.task_id, "Task created successfully");
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, principal, req), fields(principal = %principal.email, login_id = principal.login_id, task_id = %*path))]
pub async fn update_task(
    state: web::Data<AppState>,
    principal: AuthenticatedLogin,
    path: web::Path<i64>,
    req: web::Json<TaskPayload>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let task = state
        .task_service
        .update_task(task_id, req.into_inner())
        .await
        .map_err(|e| {
            error!(task_id = task_id, error = %e, "Failed to update task");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, principal), fields(principal = %principal.email, login_id = principal.login_id, task_id = %*path))]
pub async fn delete_task(
    state: web::Data<AppState>,
    principal: AuthenticatedLogin,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.task_service.delete_task(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state, req), fields(task_id = %*path))]
pub async fn add_roomies_to_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<Vec<i64>>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let roomie_ids = req.into_inner();
    info!(task_id = task_id, roomie_ids = ?roomie_ids, "Assigning roomies to task");
    state
        .task_service
        .add_roomies_to_task(task_id, &roomie_ids)
        .await
        .map_err(|e| {
            error!(task_id = task_id, error = %e, "Failed to assign roomies");
            ApiError::from(e)
        })?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Roomies assigned successfully.")))
}

#[instrument(skip(state))]
pub async fn remove_roomie_from_task(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (task_id, roomie_id) = path.into_inner();
    state
        .task_service
        .remove_roomie_from_task(task_id, roomie_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state), fields(task_id = %*path))]
pub async fn get_roomies_for_task(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let roomies = state
        .task_service
        .roomies_for_task(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(roomies))
}
