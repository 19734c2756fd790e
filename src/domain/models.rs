use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Account record. The hash never leaves the service; see [`LoginView`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Login {
    pub login_id: i64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewLogin {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginView {
    pub login_id: i64,
    pub email: String,
}

impl From<Login> for LoginView {
    fn from(login: Login) -> Self {
        Self {
            login_id: login.login_id,
            email: login.email,
        }
    }
}

/// A household member owned by one login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Roomie {
    pub roomie_id: i64,
    pub roomie_name: String,
    pub login_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoomie {
    pub roomie_name: String,
    pub login_id: i64,
}

/// A chore, linked to roomies only through assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PlannerTask {
    pub task_id: i64,
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Body of the task create and update endpoints. `taskId` is ignored on
/// create and must match the path on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
}

impl TaskPayload {
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            task_name: self.task_name,
            description: self.description,
            due_date: self.due_date,
            is_completed: self.is_completed,
        }
    }

    pub fn into_task(self, task_id: i64) -> PlannerTask {
        PlannerTask {
            task_id,
            task_name: self.task_name,
            description: self.description,
            due_date: self.due_date,
            is_completed: self.is_completed,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "passwordHash")]
    pub password: Option<String>,
    #[serde(default)]
    pub roomie_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "passwordHash")]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "passwordHash")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoginRequest {
    #[serde(default)]
    pub login_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "passwordHash")]
    pub password: Option<String>,
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
