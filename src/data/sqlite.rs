use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::{Login, NewLogin, NewRoomie, NewTask, PlannerTask, Roomie};
use crate::domain::repository::{LoginRepository, RoomieRepository, TaskRepository};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return DomainError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return DomainError::NotFound(db_err.message().to_string());
            }
        }
        error!(error = %err, "SQLite query failed");
        DomainError::Storage(err.to_string())
    }
}

/// Relational store backed by a SQLite pool. All statements are
/// parameterized.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginRepository for SqliteStore {
    #[instrument(skip(self, login), fields(email = %login.email))]
    async fn create_login(&self, login: NewLogin) -> DomainResult<Login> {
        let login = sqlx::query_as::<_, Login>(
            r#"
            INSERT INTO logins (email, password_hash)
            VALUES (?, ?)
            RETURNING login_id, email, password_hash
            "#,
        )
        .bind(login.email)
        .bind(login.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => DomainError::duplicate_email(),
            other => other,
        })?;
        debug!(login_id = login.login_id, "Login inserted");
        Ok(login)
    }

    async fn find_login_by_id(&self, login_id: i64) -> DomainResult<Option<Login>> {
        let login = sqlx::query_as::<_, Login>(
            "SELECT login_id, email, password_hash FROM logins WHERE login_id = ?",
        )
        .bind(login_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(login)
    }

    async fn find_login_by_email(&self, email: &str) -> DomainResult<Option<Login>> {
        let login = sqlx::query_as::<_, Login>(
            "SELECT login_id, email, password_hash FROM logins WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(login)
    }

    async fn list_logins(&self) -> DomainResult<Vec<Login>> {
        let logins = sqlx::query_as::<_, Login>(
            "SELECT login_id, email, password_hash FROM logins ORDER BY login_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(logins)
    }

    #[instrument(skip(self, login), fields(login_id = login.login_id))]
    async fn update_login(&self, login: Login) -> DomainResult<Login> {
        let updated = sqlx::query_as::<_, Login>(
            r#"
            UPDATE logins
            SET email = ?, password_hash = ?
            WHERE login_id = ?
            RETURNING login_id, email, password_hash
            "#,
        )
        .bind(&login.email)
        .bind(&login.password_hash)
        .bind(login.login_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => DomainError::duplicate_email(),
            other => other,
        })?;
        updated.ok_or_else(|| DomainError::login_not_found(login.login_id))
    }

    #[instrument(skip(self))]
    async fn delete_login(&self, login_id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM logins WHERE login_id = ?")
            .bind(login_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::login_not_found(login_id));
        }
        Ok(())
    }
}

#[async_trait]
impl RoomieRepository for SqliteStore {
    #[instrument(skip(self, roomie), fields(login_id = roomie.login_id))]
    async fn create_roomie(&self, roomie: NewRoomie) -> DomainResult<Roomie> {
        let login_id = roomie.login_id;
        let roomie = sqlx::query_as::<_, Roomie>(
            r#"
            INSERT INTO roomies (roomie_name, login_id)
            VALUES (?, ?)
            RETURNING roomie_id, roomie_name, login_id
            "#,
        )
        .bind(roomie.roomie_name)
        .bind(login_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::NotFound(_) => DomainError::login_not_found(login_id),
            other => other,
        })?;
        debug!(roomie_id = roomie.roomie_id, "Roomie inserted");
        Ok(roomie)
    }

    async fn find_roomie_by_id(&self, roomie_id: i64) -> DomainResult<Option<Roomie>> {
        let roomie = sqlx::query_as::<_, Roomie>(
            "SELECT roomie_id, roomie_name, login_id FROM roomies WHERE roomie_id = ?",
        )
        .bind(roomie_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(roomie)
    }

    async fn list_roomies(&self) -> DomainResult<Vec<Roomie>> {
        let roomies = sqlx::query_as::<_, Roomie>(
            "SELECT roomie_id, roomie_name, login_id FROM roomies ORDER BY roomie_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roomies)
    }

    async fn list_roomies_for_login(&self, login_id: i64) -> DomainResult<Vec<Roomie>> {
        let roomies = sqlx::query_as::<_, Roomie>(
            r#"
            SELECT roomie_id, roomie_name, login_id
            FROM roomies
            WHERE login_id = ?
            ORDER BY roomie_id
            "#,
        )
        .bind(login_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roomies)
    }

    #[instrument(skip(self))]
    async fn delete_roomie(&self, roomie_id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM roomies WHERE roomie_id = ?")
            .bind(roomie_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::roomie_not_found(roomie_id));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for SqliteStore {
    #[instrument(skip(self, task), fields(task_name = %task.task_name))]
    async fn create_task(&self, task: NewTask) -> DomainResult<PlannerTask> {
        let task = sqlx::query_as::<_, PlannerTask>(
            r#"
            INSERT INTO tasks (task_name, description, due_date, is_completed)
            VALUES (?, ?, ?, ?)
            RETURNING task_id, task_name, description, due_date, is_completed
            "#,
        )
        .bind(task.task_name)
        .bind(task.description)
        .bind(task.due_date)
        .bind(task.is_completed)
        .fetch_one(&self.pool)
        .await?;
        debug!(task_id = task.task_id, "Task inserted");
        Ok(task)
    }

    async fn find_task_by_id(&self, task_id: i64) -> DomainResult<Option<PlannerTask>> {
        let task = sqlx::query_as::<_, PlannerTask>(
            r#"
            SELECT task_id, task_name, description, due_date, is_completed
            FROM tasks
            WHERE task_id = ?
            "#,
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn list_tasks(&self) -> DomainResult<Vec<PlannerTask>> {
        let tasks = sqlx::query_as::<_, PlannerTask>(
            r#"
            SELECT task_id, task_name, description, due_date, is_completed
            FROM tasks
            ORDER BY task_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(task_id = task.task_id))]
    async fn update_task(&self, task: PlannerTask) -> DomainResult<PlannerTask> {
        let task_id = task.task_id;
        let updated = sqlx::query_as::<_, PlannerTask>(
            r#"
            UPDATE tasks
            SET task_name = ?, description = ?, due_date = ?, is_completed = ?
            WHERE task_id = ?
            RETURNING task_id, task_name, description, due_date, is_completed
            "#,
        )
        .bind(task.task_name)
        .bind(task.description)
        .bind(task.due_date)
        .bind(task.is_completed)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or_else(|| DomainError::task_not_found(task_id))
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, task_id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE task_id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::task_not_found(task_id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn assign_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()> {
        sqlx::query("INSERT INTO task_roomies (task_id, roomie_id) VALUES (?, ?)")
            .bind(task_id)
            .bind(roomie_id)
            .execute(&self.pool)
            .await?;
        debug!(task_id = task_id, roomie_id = roomie_id, "Assignment inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_roomie(&self, task_id: i64, roomie_id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM task_roomies WHERE task_id = ? AND roomie_id = ?")
            .bind(task_id)
            .bind(roomie_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound(format!(
                "Roomie ID {} is not assigned to Task ID {}.",
                roomie_id, task_id
            )));
        }
        Ok(())
    }

    async fn roomies_for_task(&self, task_id: i64) -> DomainResult<Vec<Roomie>> {
        let roomies = sqlx::query_as::<_, Roomie>(
            r#"
            SELECT r.roomie_id, r.roomie_name, r.login_id
            FROM roomies r
            JOIN task_roomies tr ON tr.roomie_id = r.roomie_id
            WHERE tr.task_id = ?
            ORDER BY r.roomie_id
            "#,
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roomies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::{DatabaseConfig, create_pool};

    async fn store() -> SqliteStore {
        let pool = create_pool(&DatabaseConfig::default()).await.unwrap();
        SqliteStore::new(pool)
    }

    async fn seed_login(store: &SqliteStore, email: &str) -> Login {
        store
            .create_login(NewLogin {
                email: email.to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    async fn seed_roomie(store: &SqliteStore, login_id: i64, name: &str) -> Roomie {
        store
            .create_roomie(NewRoomie {
                roomie_name: name.to_string(),
                login_id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_crud() {
        let store = store().await;

        let login = seed_login(&store, "a@example.com").await;
        assert!(login.login_id > 0);

        let found = store.find_login_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found, login);

        let mut changed = found.clone();
        changed.email = "b@example.com".to_string();
        let updated = store.update_login(changed).await.unwrap();
        assert_eq!(updated.email, "b@example.com");

        store.delete_login(login.login_id).await.unwrap();
        assert!(store.find_login_by_id(login.login_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_email_is_enforced_by_the_table() {
        let store = store().await;
        seed_login(&store, "dup@example.com").await;

        let result = store
            .create_login(NewLogin {
                email: "dup@example.com".to_string(),
                password_hash: "other".to_string(),
            })
            .await;

        assert_eq!(result, Err(DomainError::duplicate_email()));
        assert_eq!(store.list_logins().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_login_are_not_found() {
        let store = store().await;

        let update = store
            .update_login(Login {
                login_id: 77,
                email: "ghost@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert_eq!(update, Err(DomainError::login_not_found(77)));
        assert_eq!(store.delete_login(77).await, Err(DomainError::login_not_found(77)));
    }

    #[tokio::test]
    async fn test_create_roomie_for_unknown_login_is_not_found() {
        let store = store().await;

        let result = store
            .create_roomie(NewRoomie {
                roomie_name: "Ghost".to_string(),
                login_id: 5,
            })
            .await;

        assert_eq!(result, Err(DomainError::login_not_found(5)));
    }

    #[tokio::test]
    async fn test_task_round_trip_keeps_optional_fields() {
        let store = store().await;

        let created = store
            .create_task(NewTask {
                task_name: "Dishes".to_string(),
                description: Some("After dinner".to_string()),
                due_date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1),
                is_completed: false,
            })
            .await
            .unwrap();

        let mut task = store.find_task_by_id(created.task_id).await.unwrap().unwrap();
        assert_eq!(task, created);

        task.is_completed = true;
        let updated = store.update_task(task.clone()).await.unwrap();
        assert_eq!(updated, task);
        assert_eq!(store.list_tasks().await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_assignment_relation() {
        let store = store().await;
        let login = seed_login(&store, "a@example.com").await;
        let ann = seed_roomie(&store, login.login_id, "Ann").await;
        let ben = seed_roomie(&store, login.login_id, "Ben").await;
        let task = store
            .create_task(NewTask {
                task_name: "Trash".to_string(),
                ..NewTask::default()
            })
            .await
            .unwrap();

        store.assign_roomie(task.task_id, ann.roomie_id).await.unwrap();
        store.assign_roomie(task.task_id, ben.roomie_id).await.unwrap();
        assert!(matches!(
            store.assign_roomie(task.task_id, ann.roomie_id).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            store.assign_roomie(task.task_id, 999).await,
            Err(DomainError::NotFound(_))
        ));

        assert_eq!(
            store.roomies_for_task(task.task_id).await.unwrap(),
            vec![ann.clone(), ben.clone()]
        );

        store.remove_roomie(task.task_id, ann.roomie_id).await.unwrap();
        assert!(matches!(
            store.remove_roomie(task.task_id, ann.roomie_id).await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(store.roomies_for_task(task.task_id).await.unwrap(), vec![ben]);
    }

    #[tokio::test]
    async fn test_delete_login_cascades() {
        let store = store().await;
        let login = seed_login(&store, "a@example.com").await;
        let roomie = seed_roomie(&store, login.login_id, "Ann").await;
        let task = store
            .create_task(NewTask {
                task_name: "Mop".to_string(),
                ..NewTask::default()
            })
            .await
            .unwrap();
        store.assign_roomie(task.task_id, roomie.roomie_id).await.unwrap();

        store.delete_login(login.login_id).await.unwrap();

        assert!(store.list_roomies_for_login(login.login_id).await.unwrap().is_empty());
        assert!(store.roomies_for_task(task.task_id).await.unwrap().is_empty());
    }
}
