use crate::application::auth_service::AuthService;
use crate::application::login_service::LoginService;
use crate::application::roomie_service::RoomieService;
use crate::application::task_service::TaskService;
use crate::domain::error::DomainError;
use crate::domain::repository::{LoginRepository, RoomieRepository, TaskRepository};
use crate::presentation::middleware::AuthenticatedLogin;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Services shared by every handler. Each one receives its repository at
/// construction; handlers never reach the store directly.
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub login_service: LoginService,
    pub roomie_service: RoomieService,
    pub task_service: TaskService,
}

impl AppState {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: LoginRepository + RoomieRepository + TaskRepository + 'static,
    {
        Self {
            auth_service: Arc::new(AuthService::new(store.clone(), store.clone())),
            login_service: LoginService::new(store.clone()),
            roomie_service: RoomieService::new(store.clone()),
            task_service: TaskService::new(store),
        }
    }
}

// Uniform error response format
#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: ErrorDetails,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorDetails {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        // Log error based on severity
        match self {
            ApiError::Internal(_) => error!(error = %error_msg, status = %status, "Internal error"),
            _ => warn!(error = %error_msg, status = %status, "Request rejected"),
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_msg,
            details: ErrorDetails {
                message: self.message().to_string(),
            },
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
            DomainError::Storage(detail) => {
                // Driver text stays in the logs.
                error!(detail = %detail, "Storage failure");
                ApiError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

// Malformed bodies, paths and queries share the error body above.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| ApiError::Validation(err.to_string()).into())
}

impl FromRequest for AuthenticatedLogin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let login = req.extensions().get::<AuthenticatedLogin>().cloned();
        ready(login.ok_or_else(|| ApiError::Unauthorized("Login not authenticated".to_string())))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}
