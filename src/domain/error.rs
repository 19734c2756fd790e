use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn login_not_found(login_id: i64) -> Self {
        DomainError::NotFound(format!("Login with ID {} not found.", login_id))
    }

    pub fn roomie_not_found(roomie_id: i64) -> Self {
        DomainError::NotFound(format!("Roomie with ID {} not found.", roomie_id))
    }

    pub fn task_not_found(task_id: i64) -> Self {
        DomainError::NotFound(format!("Task with ID {} not found.", task_id))
    }

    pub fn duplicate_email() -> Self {
        DomainError::Conflict("An account with this email already exists.".to_string())
    }
}
