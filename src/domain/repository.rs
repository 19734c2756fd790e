use crate::domain::error::DomainResult;
use crate::domain::models::{Login, NewLogin, NewRoomie, NewTask, PlannerTask, Roomie};
use async_trait::async_trait;

/// Login persistence. `create_login` and `update_login` return
/// `DomainError::Conflict` when the email belongs to another login.
#[async_trait]
pub trait LoginRepository: Send + Sync {
    async fn create_login(&self, login: NewLogin) -> DomainResult<Login>;
    async fn find_login_by_id(&self, login_id: i64) -> DomainResult<Option<Login>>;
    async fn find_login_by_email(&self, email: &str) -> DomainResult<Option<Login>>;
    async fn list_logins(&self) -> DomainResult<Vec<Login>>;
    async fn update_login(&self, login: Login) -> DomainResult<Login>;
    async fn delete_login(&self, login_id: i64) -> DomainResult<()>;
}

#[async_trait]
pub trait RoomieRepository: Send + Sync {
    async fn create_roomie(&self, roomie: NewRoomie) -> DomainResult<Roomie>;
    async fn find_roomie_by_id(&self, roomie_id: i64) -> DomainResult<Option<Roomie>>;
    async fn list_roomies(&self) -> DomainResult<Vec<Roomie>>;
    async fn list_roomies_for_login(&self, login_id: i64) -> DomainResult<Vec<Roomie>>;
    async fn delete_roomie(&self, roomie_id: i64) -> DomainResult<()>;
}

/// Task persistence plus the task/roomie assignment relation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: NewTask) -> DomainResult<PlannerTask>;
    async fn find_task_by_id(&self, task_id: i64) -> DomainResult<Option<PlannerTask>>;
    async fn list_tasks(&self) -> DomainResult<Vec<PlannerTask>>;
    async fn update_task(&self, task: PlannerTask) -> DomainResult<PlannerTask>;
    async fn delete_task(&self, task_id: i64) -> DomainResult<()>;
    /// Fails with `NotFound` for an unknown task or roomie and with
    /// `Conflict` when the pair is already assigned.
    async fn assign_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()>;
    async fn remove_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()>;
    async fn roomies_for_task(&self, task_id: i64) -> DomainResult<Vec<Roomie>>;
}
