use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{Login, NewLogin, NewRoomie, NewTask, PlannerTask, Roomie};
use crate::domain::repository::{LoginRepository, RoomieRepository, TaskRepository};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Default)]
struct Tables {
    logins: BTreeMap<i64, Login>,
    roomies: BTreeMap<i64, Roomie>,
    tasks: BTreeMap<i64, PlannerTask>,
    // (task_id, roomie_id)
    assignments: BTreeSet<(i64, i64)>,
    last_login_id: i64,
    last_roomie_id: i64,
    last_task_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.logins
            .values()
            .any(|l| l.email == email && Some(l.login_id) != except)
    }

    fn drop_roomie(&mut self, roomie_id: i64) {
        self.roomies.remove(&roomie_id);
        self.assignments.retain(|&(_, r)| r != roomie_id);
    }
}

/// All tables behind a single lock, so check-then-write sequences such as
/// the email uniqueness check are atomic.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginRepository for InMemoryStore {
    #[instrument(skip(self, login), fields(email = %login.email))]
    async fn create_login(&self, login: NewLogin) -> DomainResult<Login> {
        trace!("Acquiring write lock for login storage");
        let mut tables = self.tables.write().await;
        if tables.email_taken(&login.email, None) {
            return Err(DomainError::duplicate_email());
        }
        tables.last_login_id += 1;
        let login = Login {
            login_id: tables.last_login_id,
            email: login.email,
            password_hash: login.password_hash,
        };
        tables.logins.insert(login.login_id, login.clone());
        debug!(login_id = login.login_id, email = %login.email, "Login saved to memory storage");
        Ok(login)
    }

    #[instrument(skip(self))]
    async fn find_login_by_id(&self, login_id: i64) -> DomainResult<Option<Login>> {
        let tables = self.tables.read().await;
        Ok(tables.logins.get(&login_id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_login_by_email(&self, email: &str) -> DomainResult<Option<Login>> {
        let tables = self.tables.read().await;
        let login = tables.logins.values().find(|l| l.email == email).cloned();
        if login.is_none() {
            trace!(email = email, "Login not found in storage");
        }
        Ok(login)
    }

    async fn list_logins(&self) -> DomainResult<Vec<Login>> {
        let tables = self.tables.read().await;
        Ok(tables.logins.values().cloned().collect())
    }

    #[instrument(skip(self, login), fields(login_id = login.login_id))]
    async fn update_login(&self, login: Login) -> DomainResult<Login> {
        let mut tables = self.tables.write().await;
        if !tables.logins.contains_key(&login.login_id) {
            return Err(DomainError::login_not_found(login.login_id));
        }
        if tables.email_taken(&login.email, Some(login.login_id)) {
            return Err(DomainError::duplicate_email());
        }
        tables.logins.insert(login.login_id, login.clone());
        debug!(login_id = login.login_id, "Login updated in memory storage");
        Ok(login)
    }

    #[instrument(skip(self))]
    async fn delete_login(&self, login_id: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.logins.remove(&login_id).is_none() {
            return Err(DomainError::login_not_found(login_id));
        }
        let owned: Vec<i64> = tables
            .roomies
            .values()
            .filter(|r| r.login_id == login_id)
            .map(|r| r.roomie_id)
            .collect();
        for roomie_id in owned {
            tables.drop_roomie(roomie_id);
        }
        debug!(login_id = login_id, "Login and its roomies removed from memory storage");
        Ok(())
    }
}

#[async_trait]
impl RoomieRepository for InMemoryStore {
    #[instrument(skip(self, roomie), fields(login_id = roomie.login_id))]
    async fn create_roomie(&self, roomie: NewRoomie) -> DomainResult<Roomie> {
        let mut tables = self.tables.write().await;
        if !tables.logins.contains_key(&roomie.login_id) {
            return Err(DomainError::login_not_found(roomie.login_id));
        }
        tables.last_roomie_id += 1;
        let roomie = Roomie {
            roomie_id: tables.last_roomie_id,
            roomie_name: roomie.roomie_name,
            login_id: roomie.login_id,
        };
        tables.roomies.insert(roomie.roomie_id, roomie.clone());
        debug!(roomie_id = roomie.roomie_id, "Roomie saved to memory storage");
        Ok(roomie)
    }

    async fn find_roomie_by_id(&self, roomie_id: i64) -> DomainResult<Option<Roomie>> {
        let tables = self.tables.read().await;
        Ok(tables.roomies.get(&roomie_id).cloned())
    }

    async fn list_roomies(&self) -> DomainResult<Vec<Roomie>> {
        let tables = self.tables.read().await;
        Ok(tables.roomies.values().cloned().collect())
    }

    async fn list_roomies_for_login(&self, login_id: i64) -> DomainResult<Vec<Roomie>> {
        let tables = self.tables.read().await;
        Ok(tables
            .roomies
            .values()
            .filter(|r| r.login_id == login_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn delete_roomie(&self, roomie_id: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.roomies.contains_key(&roomie_id) {
            return Err(DomainError::roomie_not_found(roomie_id));
        }
        tables.drop_roomie(roomie_id);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    #[instrument(skip(self, task), fields(task_name = %task.task_name))]
    async fn create_task(&self, task: NewTask) -> DomainResult<PlannerTask> {
        let mut tables = self.tables.write().await;
        tables.last_task_id += 1;
        let task = PlannerTask {
            task_id: tables.last_task_id,
            task_name: task.task_name,
            description: task.description,
            due_date: task.due_date,
            is_completed: task.is_completed,
        };
        tables.tasks.insert(task.task_id, task.clone());
        debug!(task_id = task.task_id, "Task saved to memory storage");
        Ok(task)
    }

    async fn find_task_by_id(&self, task_id: i64) -> DomainResult<Option<PlannerTask>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.get(&task_id).cloned())
    }

    async fn list_tasks(&self) -> DomainResult<Vec<PlannerTask>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.values().cloned().collect())
    }

    #[instrument(skip(self, task), fields(task_id = task.task_id))]
    async fn update_task(&self, task: PlannerTask) -> DomainResult<PlannerTask> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get_mut(&task.task_id) {
            Some(existing) => {
                *existing = task.clone();
                Ok(task)
            }
            None => Err(DomainError::task_not_found(task.task_id)),
        }
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, task_id: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if tables.tasks.remove(&task_id).is_none() {
            return Err(DomainError::task_not_found(task_id));
        }
        tables.assignments.retain(|&(t, _)| t != task_id);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn assign_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&task_id) {
            return Err(DomainError::task_not_found(task_id));
        }
        if !tables.roomies.contains_key(&roomie_id) {
            return Err(DomainError::roomie_not_found(roomie_id));
        }
        if !tables.assignments.insert((task_id, roomie_id)) {
            return Err(DomainError::Conflict(format!(
                "Roomie ID {} is already assigned to Task ID {}.",
                roomie_id, task_id
            )));
        }
        debug!(task_id = task_id, roomie_id = roomie_id, "Assignment saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.assignments.remove(&(task_id, roomie_id)) {
            return Err(DomainError::NotFound(format!(
                "Roomie ID {} is not assigned to Task ID {}.",
                roomie_id, task_id
            )));
        }
        Ok(())
    }

    async fn roomies_for_task(&self, task_id: i64) -> DomainResult<Vec<Roomie>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .range((task_id, i64::MIN)..=(task_id, i64::MAX))
            .filter_map(|&(_, roomie_id)| tables.roomies.get(&roomie_id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_login(email: &str) -> NewLogin {
        NewLogin {
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_task(name: &str) -> NewTask {
        NewTask {
            task_name: name.to_string(),
            ..NewTask::default()
        }
    }

    #[tokio::test]
    async fn test_create_login_assigns_increasing_ids() {
        let store = InMemoryStore::new();

        let first = store.create_login(new_login("a@example.com")).await.unwrap();
        let second = store.create_login(new_login("b@example.com")).await.unwrap();

        assert!(first.login_id > 0);
        assert!(second.login_id > first.login_id);
    }

    #[tokio::test]
    async fn test_create_login_rejects_duplicate_email() {
        let store = InMemoryStore::new();
        store.create_login(new_login("dup@example.com")).await.unwrap();

        let result = store.create_login(new_login("dup@example.com")).await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(store.list_logins().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signups_store_one_login() {
        let store = InMemoryStore::new();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_login(new_login("race@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.list_logins().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_login_by_email_is_case_sensitive() {
        let store = InMemoryStore::new();
        store.create_login(new_login("Case@Example.com")).await.unwrap();

        assert!(store.find_login_by_email("Case@Example.com").await.unwrap().is_some());
        assert!(store.find_login_by_email("case@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_login_rejects_email_of_other_login() {
        let store = InMemoryStore::new();
        store.create_login(new_login("a@example.com")).await.unwrap();
        let mut b = store.create_login(new_login("b@example.com")).await.unwrap();

        b.email = "a@example.com".to_string();
        let result = store.update_login(b).await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_login_cascades_to_roomies_and_assignments() {
        let store = InMemoryStore::new();
        let login = store.create_login(new_login("a@example.com")).await.unwrap();
        let roomie = store
            .create_roomie(NewRoomie {
                roomie_name: "Ann".to_string(),
                login_id: login.login_id,
            })
            .await
            .unwrap();
        let task = store.create_task(new_task("Dishes")).await.unwrap();
        store.assign_roomie(task.task_id, roomie.roomie_id).await.unwrap();

        store.delete_login(login.login_id).await.unwrap();

        assert!(store.find_roomie_by_id(roomie.roomie_id).await.unwrap().is_none());
        assert!(store.roomies_for_task(task.task_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_roomie_requires_existing_login() {
        let store = InMemoryStore::new();

        let result = store
            .create_roomie(NewRoomie {
                roomie_name: "Ghost".to_string(),
                login_id: 42,
            })
            .await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_roomie_errors() {
        let store = InMemoryStore::new();
        let login = store.create_login(new_login("a@example.com")).await.unwrap();
        let roomie = store
            .create_roomie(NewRoomie {
                roomie_name: "Ann".to_string(),
                login_id: login.login_id,
            })
            .await
            .unwrap();
        let task = store.create_task(new_task("Laundry")).await.unwrap();

        assert!(matches!(
            store.assign_roomie(999, roomie.roomie_id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            store.assign_roomie(task.task_id, 999).await,
            Err(DomainError::NotFound(_))
        ));
        store.assign_roomie(task.task_id, roomie.roomie_id).await.unwrap();
        assert!(matches!(
            store.assign_roomie(task.task_id, roomie.roomie_id).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_roomies_for_task_only_returns_that_task() {
        let store = InMemoryStore::new();
        let login = store.create_login(new_login("a@example.com")).await.unwrap();
        let mut roomies = Vec::new();
        for name in ["Ann", "Ben", "Cat"] {
            roomies.push(
                store
                    .create_roomie(NewRoomie {
                        roomie_name: name.to_string(),
                        login_id: login.login_id,
                    })
                    .await
                    .unwrap(),
            );
        }
        let dishes = store.create_task(new_task("Dishes")).await.unwrap();
        let trash = store.create_task(new_task("Trash")).await.unwrap();
        store.assign_roomie(dishes.task_id, roomies[2].roomie_id).await.unwrap();
        store.assign_roomie(dishes.task_id, roomies[0].roomie_id).await.unwrap();
        store.assign_roomie(trash.task_id, roomies[1].roomie_id).await.unwrap();

        let names: Vec<String> = store
            .roomies_for_task(dishes.task_id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.roomie_name)
            .collect();

        assert_eq!(names, vec!["Ann".to_string(), "Cat".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_roomie_without_assignment_is_not_found() {
        let store = InMemoryStore::new();
        let task = store.create_task(new_task("Vacuum")).await.unwrap();

        let result = store.remove_roomie(task.task_id, 1).await;

        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_task_removes_assignments() {
        let store = InMemoryStore::new();
        let login = store.create_login(new_login("a@example.com")).await.unwrap();
        let roomie = store
            .create_roomie(NewRoomie {
                roomie_name: "Ann".to_string(),
                login_id: login.login_id,
            })
            .await
            .unwrap();
        let task = store.create_task(new_task("Mop")).await.unwrap();
        store.assign_roomie(task.task_id, roomie.roomie_id).await.unwrap();

        store.delete_task(task.task_id).await.unwrap();

        assert!(store.find_task_by_id(task.task_id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_task(task.task_id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
