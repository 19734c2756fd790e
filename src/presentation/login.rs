use crate::domain::models::{
    CreateLoginRequest, LoginRequest, LoginView, SignupRequest, UpdateLoginRequest,
};
use crate::presentation::handlers::{ApiError, AppState, MessageResponse};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub login_id: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub email: String,
    pub login_id: i64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCreatedResponse {
    pub message: String,
    pub login_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[instrument(skip(state, req))]
pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(email = req.email.as_deref().unwrap_or_default(), "Signup request received");

    let outcome = state
        .auth_service
        .signup(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to sign up");
            ApiError::from(e)
        })?;

    info!(
        login_id = outcome.login.login_id,
        roomies = outcome.roomies.len(),
        "Signup successful"
    );
    Ok(HttpResponse::Ok().json(SignupResponse {
        success: true,
        message: "Signup successful.".to_string(),
        login_id: outcome.login.login_id,
    }))
}

#[instrument(skip(state, req))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!(email = %req.email, "Login request received");

    let login = state.auth_service.login(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_string(),
        email: login.email,
        login_id: login.login_id,
    }))
}

pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "Login system is operational.".to_string(),
    })
}

#[instrument(skip(state))]
pub async fn list_logins(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let logins: Vec<LoginView> = state
        .login_service
        .list_logins()
        .await?
        .into_iter()
        .map(LoginView::from)
        .collect();
    info!(count = logins.len(), "Logins listed");
    Ok(HttpResponse::Ok().json(logins))
}

#[instrument(skip(state), fields(login_id = %*path))]
pub async fn get_login(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let login = state.login_service.get_login(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LoginView::from(login)))
}

#[instrument(skip(state, req))]
pub async fn create_login(
    state: web::Data<AppState>,
    req: web::Json<CreateLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let login = state
        .login_service
        .create_login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create login");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(LoginCreatedResponse {
        message: "Login created successfully.".to_string(),
        login_id: login.login_id,
    }))
}

#[instrument(skip(state, req), fields(login_id = %*path))]
pub async fn update_login(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    req: web::Json<UpdateLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let login_id = path.into_inner();
    state
        .login_service
        .update_login(login_id, req.into_inner())
        .await
        .map_err(|e| {
            error!(login_id = login_id, error = %e, "Failed to update login");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Login updated successfully.")))
}

#[instrument(skip(state), fields(login_id = %*path))]
pub async fn delete_login(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    state.login_service.delete_login(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
