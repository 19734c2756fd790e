use crate::application::auth_service::hash_secret;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{CreateLoginRequest, Login, NewLogin, UpdateLoginRequest, is_blank};
use crate::domain::repository::LoginRepository;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct LoginService {
    logins: Arc<dyn LoginRepository>,
}

impl LoginService {
    pub fn new(logins: Arc<dyn LoginRepository>) -> Self {
        Self { logins }
    }

    pub async fn list_logins(&self) -> DomainResult<Vec<Login>> {
        self.logins.list_logins().await
    }

    pub async fn get_login(&self, login_id: i64) -> DomainResult<Login> {
        self.logins
            .find_login_by_id(login_id)
            .await?
            .ok_or_else(|| DomainError::login_not_found(login_id))
    }

    #[instrument(skip(self, req))]
    pub async fn create_login(&self, req: CreateLoginRequest) -> DomainResult<Login> {
        let (email, password) = match (req.email, req.password) {
            (Some(email), Some(password))
                if !is_blank(Some(email.as_str())) && !is_blank(Some(password.as_str())) =>
            {
                (email, password)
            }
            _ => {
                warn!("Create login request is missing required fields");
                return Err(DomainError::Validation("Invalid login data.".to_string()));
            }
        };

        let login = self
            .logins
            .create_login(NewLogin {
                email,
                password_hash: hash_secret(&password).await?,
            })
            .await?;
        info!(login_id = login.login_id, "Login created");
        Ok(login)
    }

    /// Replaces the email and, when a password is supplied, the hash.
    #[instrument(skip(self, req))]
    pub async fn update_login(&self, login_id: i64, req: UpdateLoginRequest) -> DomainResult<Login> {
        let email = match (req.login_id, req.email) {
            (Some(body_id), Some(email)) if body_id == login_id && !is_blank(Some(email.as_str())) => {
                email
            }
            _ => {
                warn!(login_id = login_id, "Update login rejected, invalid data or ID mismatch");
                return Err(DomainError::Validation(
                    "Invalid login data or ID mismatch.".to_string(),
                ));
            }
        };

        let existing = self.get_login(login_id).await?;
        let password_hash = match req.password.as_deref() {
            Some(password) if !password.trim().is_empty() => hash_secret(password).await?,
            _ => existing.password_hash,
        };

        let login = self
            .logins
            .update_login(Login {
                login_id,
                email,
                password_hash,
            })
            .await?;
        info!(login_id = login.login_id, "Login updated");
        Ok(login)
    }

    #[instrument(skip(self))]
    pub async fn delete_login(&self, login_id: i64) -> DomainResult<()> {
        self.logins.delete_login(login_id).await?;
        info!(login_id = login_id, "Login deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::infrastructure::security::verify_password;

    fn create_request(email: &str, password: &str) -> CreateLoginRequest {
        CreateLoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_login() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));

        let created = service
            .create_login(create_request("a@example.com", "secret"))
            .await
            .unwrap();
        let fetched = service.get_login(created.login_id).await.unwrap();

        assert_eq!(fetched, created);
        assert!(verify_password("secret", &fetched.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_create_login_validation_and_conflict() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));
        service
            .create_login(create_request("a@example.com", "secret"))
            .await
            .unwrap();

        assert!(matches!(
            service.create_login(create_request("", "secret")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create_login(create_request("a@example.com", "other")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_login_requires_matching_ids() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));
        let login = service
            .create_login(create_request("a@example.com", "secret"))
            .await
            .unwrap();

        let result = service
            .update_login(
                login.login_id,
                UpdateLoginRequest {
                    login_id: Some(login.login_id + 1),
                    email: Some("b@example.com".to_string()),
                    password: None,
                },
            )
            .await;

        assert_eq!(
            result.err(),
            Some(DomainError::Validation("Invalid login data or ID mismatch.".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_login_without_password_keeps_hash() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));
        let login = service
            .create_login(create_request("a@example.com", "secret"))
            .await
            .unwrap();

        let updated = service
            .update_login(
                login.login_id,
                UpdateLoginRequest {
                    login_id: Some(login.login_id),
                    email: Some("b@example.com".to_string()),
                    password: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "b@example.com");
        assert_eq!(updated.password_hash, login.password_hash);
    }

    #[tokio::test]
    async fn test_update_login_with_password_rehashes() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));
        let login = service
            .create_login(create_request("a@example.com", "secret"))
            .await
            .unwrap();

        let updated = service
            .update_login(
                login.login_id,
                UpdateLoginRequest {
                    login_id: Some(login.login_id),
                    email: Some("a@example.com".to_string()),
                    password: Some("new-secret".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(verify_password("new-secret", &updated.password_hash).unwrap());
        assert!(!verify_password("secret", &updated.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_login_are_not_found() {
        let service = LoginService::new(Arc::new(InMemoryStore::new()));

        let update = service
            .update_login(
                9,
                UpdateLoginRequest {
                    login_id: Some(9),
                    email: Some("x@example.com".to_string()),
                    password: None,
                },
            )
            .await;

        assert_eq!(update.err(), Some(DomainError::login_not_found(9)));
        assert_eq!(
            service.delete_login(9).await.err(),
            Some(DomainError::login_not_found(9))
        );
    }
}
