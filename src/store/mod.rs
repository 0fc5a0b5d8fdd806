use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Persisted user record. The hash is for in-process verification only
/// and never serialized to clients.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Persisted task record. The owner serializes as `userId` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub allotted_to: String,
    pub done_by: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_time: Option<OffsetDateTime>,
}

/// Fields for a task insert; the identifier is generated by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub allotted_to: String,
    pub done_by: String,
    pub status: String,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
}

/// Mutable fields replaced wholesale on update. Identifier and owner are
/// never caller-controlled.
#[derive(Debug, Clone)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub allotted_to: String,
    pub done_by: String,
    pub status: String,
    pub end_time: Option<OffsetDateTime>,
}

#[derive(Debug, thiserror::Error)]
pub enum InsertUserError {
    #[error("username already taken")]
    UsernameTaken,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, InsertUserError>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}

/// Every operation filters jointly on (task id, owner id); a mismatch on
/// either reads as absence.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: NewTask) -> anyhow::Result<Task>;

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Task>>;

    async fn find(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<Option<Task>>;

    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        fields: TaskUpdate,
    ) -> anyhow::Result<Option<Task>>;

    /// True iff a record was deleted.
    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<bool>;
}
