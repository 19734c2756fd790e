use crate::domain::models::NewRoomie;
use crate::presentation::handlers::{ApiError, AppState};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomieFilter {
    pub login_id: Option<i64>,
}

#[instrument(skip(state))]
pub async fn list_roomies(
    state: web::Data<AppState>,
    filter: web::Query<RoomieFilter>,
) -> Result<HttpResponse, ApiError> {
    let roomies = state.roomie_service.list_roomies(filter.login_id).await?;
    Ok(HttpResponse::Ok().json(roomies))
}

#[instrument(skip(state), fields(roomie_id = %*path))]
pub async fn get_roomie(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let roomie = state.roomie_service.get_roomie(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(roomie))
}

#[instrument(skip(state, req))]
pub async fn create_roomie(
    state: web::Data<AppState>,
    req: web::Json<NewRoomie>,
) -> Result<HttpResponse, ApiError> {
    let roomie = state.roomie_service.create_roomie(req.into_inner()).await?;
    info!(roomie_id = roomie.roomie_id, login_id = roomie.login_id, "Roomie created successfully");
    Ok(HttpResponse::Ok().json(roomie))
}

#[instrument(skip(state), fields(roomie_id = %*path))]
pub async fn delete_roomie(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.roomie_service.delete_roomie(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
