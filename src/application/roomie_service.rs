use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{NewRoomie, Roomie};
use crate::domain::repository::RoomieRepository;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct RoomieService {
    roomies: Arc<dyn RoomieRepository>,
}

impl RoomieService {
    pub fn new(roomies: Arc<dyn RoomieRepository>) -> Self {
        Self { roomies }
    }

    pub async fn list_roomies(&self, login_id: Option<i64>) -> DomainResult<Vec<Roomie>> {
        match login_id {
            Some(login_id) => self.roomies.list_roomies_for_login(login_id).await,
            None => self.roomies.list_roomies().await,
        }
    }

    pub async fn get_roomie(&self, roomie_id: i64) -> DomainResult<Roomie> {
        self.roomies
            .find_roomie_by_id(roomie_id)
            .await?
            .ok_or_else(|| DomainError::roomie_not_found(roomie_id))
    }

    #[instrument(skip(self, roomie), fields(login_id = roomie.login_id))]
    pub async fn create_roomie(&self, roomie: NewRoomie) -> DomainResult<Roomie> {
        if roomie.roomie_name.trim().is_empty() {
            return Err(DomainError::Validation("Roomie name is required.".to_string()));
        }
        let roomie = self.roomies.create_roomie(roomie).await?;
        info!(roomie_id = roomie.roomie_id, "Roomie created");
        Ok(roomie)
    }

    #[instrument(skip(self))]
    pub async fn delete_roomie(&self, roomie_id: i64) -> DomainResult<()> {
        self.roomies.delete_roomie(roomie_id).await?;
        info!(roomie_id = roomie_id, "Roomie deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;
    use crate::domain::models::NewLogin;
    use crate::domain::repository::LoginRepository;

    async fn setup() -> (RoomieService, i64, i64) {
        let store = Arc::new(InMemoryStore::new());
        let mut ids = Vec::new();
        for email in ["a@example.com", "b@example.com"] {
            let login = store
                .create_login(NewLogin {
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                })
                .await
                .unwrap();
            ids.push(login.login_id);
        }
        (RoomieService::new(store), ids[0], ids[1])
    }

    #[tokio::test]
    async fn test_list_roomies_filters_by_login() {
        let (service, a, b) = setup().await;
        for (name, login_id) in [("Ann", a), ("Ben", b), ("Cat", a)] {
            service
                .create_roomie(NewRoomie {
                    roomie_name: name.to_string(),
                    login_id,
                })
                .await
                .unwrap();
        }

        assert_eq!(service.list_roomies(None).await.unwrap().len(), 3);
        let for_a: Vec<String> = service
            .list_roomies(Some(a))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.roomie_name)
            .collect();
        assert_eq!(for_a, vec!["Ann", "Cat"]);
    }

    #[tokio::test]
    async fn test_create_roomie_rejects_blank_name() {
        let (service, a, _) = setup().await;

        let result = service
            .create_roomie(NewRoomie {
                roomie_name: "   ".to_string(),
                login_id: a,
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_and_delete_roomie() {
        let (service, a, _) = setup().await;
        let roomie = service
            .create_roomie(NewRoomie {
                roomie_name: "Ann".to_string(),
                login_id: a,
            })
            .await
            .unwrap();

        assert_eq!(service.get_roomie(roomie.roomie_id).await.unwrap(), roomie);
        service.delete_roomie(roomie.roomie_id).await.unwrap();
        assert_eq!(
            service.get_roomie(roomie.roomie_id).await.err(),
            Some(DomainError::roomie_not_found(roomie.roomie_id))
        );
    }
}
