use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{IdentityStore, InsertUserError, NewTask, Task, TaskStore, TaskUpdate, User};

#[derive(Clone)]
pub struct PgIdentityStore {
    pool: PgPool,
}

impl PgIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, InsertUserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                InsertUserError::UsernameTaken
            } else {
                InsertUserError::Store(e.into())
            }
        })?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TASK_COLUMNS: &str =
    "id, owner_id, title, description, allotted_to, done_by, status, start_time, end_time";

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn insert(&self, task: NewTask) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks
                (owner_id, title, description, allotted_to, done_by, status, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task.owner_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(&task.allotted_to)
        .bind(&task.done_by)
        .bind(&task.status)
        .bind(task.start_time)
        .bind(task.end_time)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE owner_id = $1
            ORDER BY start_time DESC
            "#,
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        ))
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        fields: TaskUpdate,
    ) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, allotted_to = $5,
                done_by = $6, status = $7, end_time = $8
            WHERE id = $1 AND owner_id = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.allotted_to)
        .bind(&fields.done_by)
        .bind(&fields.status)
        .bind(fields.end_time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(task_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
