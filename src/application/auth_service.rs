use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{
    Login, LoginRequest, NewLogin, NewRoomie, Roomie, SignupRequest, is_blank,
};
use crate::domain::repository::{LoginRepository, RoomieRepository};
use crate::infrastructure::basic_auth::BasicCredentials;
use crate::infrastructure::security::{hash_password, verify_password};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, error, info, instrument, trace, warn};

pub struct SignupOutcome {
    pub login: Login,
    pub roomies: Vec<Roomie>,
}

pub struct AuthService {
    logins: Arc<dyn LoginRepository>,
    roomies: Arc<dyn RoomieRepository>,
}

impl AuthService {
    pub fn new(logins: Arc<dyn LoginRepository>, roomies: Arc<dyn RoomieRepository>) -> Self {
        Self { logins, roomies }
    }

    /// Creates the login, then one roomie per name in order. The first
    /// roomie failure ends the signup; rows written before it are kept.
    #[instrument(skip(self, req), fields(email = req.email.as_deref().unwrap_or_default()))]
    pub async fn signup(&self, req: SignupRequest) -> DomainResult<SignupOutcome> {
        trace!("Starting signup");

        let (email, password, roomie_names) = match (req.email, req.password, req.roomie_names) {
            (Some(email), Some(password), Some(names))
                if !is_blank(Some(email.as_str())) && !is_blank(Some(password.as_str())) =>
            {
                (email, password, names)
            }
            _ => {
                warn!("Signup request is missing required fields");
                return Err(DomainError::Validation("Invalid signup data.".to_string()));
            }
        };

        if self.logins.find_login_by_email(&email).await?.is_some() {
            warn!(email = %email, "Signup rejected, email already registered");
            return Err(DomainError::duplicate_email());
        }

        let password_hash = hash_secret(&password).await?;
        let login = self
            .logins
            .create_login(NewLogin {
                email,
                password_hash,
            })
            .await?;
        debug!(login_id = login.login_id, "Login created, adding roomies");

        let mut roomies = Vec::with_capacity(roomie_names.len());
        for roomie_name in roomie_names {
            let roomie = self
                .roomies
                .create_roomie(NewRoomie {
                    roomie_name: roomie_name.clone(),
                    login_id: login.login_id,
                })
                .await
                .map_err(|e| {
                    error!(login_id = login.login_id, roomie_name = %roomie_name, error = %e, "Failed to create roomie");
                    DomainError::Internal(format!("Failed to create roomie: {}", roomie_name))
                })?;
            roomies.push(roomie);
        }

        info!(
            login_id = login.login_id,
            email = %login.email,
            roomies = roomies.len(),
            "Signup completed"
        );
        Ok(SignupOutcome { login, roomies })
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> DomainResult<Login> {
        trace!("Starting login");
        let invalid = || DomainError::Unauthorized("Invalid username or password.".to_string());

        let login = self
            .logins
            .find_login_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "Login not found during login");
                invalid()
            })?;

        if !password_matches(&login, &req.password).await? {
            warn!(login_id = login.login_id, "Invalid password during login");
            return Err(invalid());
        }

        info!(login_id = login.login_id, email = %login.email, "Login successful");
        Ok(login)
    }

    /// Checks basic-auth credentials against the stored login.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn authenticate(&self, credentials: &BasicCredentials) -> DomainResult<Login> {
        let invalid = || DomainError::Unauthorized("Invalid Username or Password".to_string());

        let login = self
            .logins
            .find_login_by_email(&credentials.email)
            .await?
            .ok_or_else(invalid)?;

        if !password_matches(&login, &credentials.password).await? {
            return Err(invalid());
        }

        trace!(login_id = login.login_id, "Credentials accepted");
        Ok(login)
    }
}

// Argon2 runs on the blocking pool so a hash never stalls the worker's
// other requests.
pub(crate) async fn hash_secret(password: &str) -> DomainResult<String> {
    let password = password.to_string();
    task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            DomainError::Internal("Failed to hash password".to_string())
        })?
        .map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal("Failed to hash password".to_string())
        })
}

async fn password_matches(login: &Login, password: &str) -> DomainResult<bool> {
    let password = password.to_string();
    let hash = login.password_hash.clone();
    task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            error!(login_id = login.login_id, error = %e, "Password verification task failed");
            DomainError::Internal("Failed to verify password".to_string())
        })?
        .map_err(|e| {
            error!(login_id = login.login_id, error = %e, "Stored password hash is unreadable");
            DomainError::Internal("Failed to verify password".to_string())
        })
}
