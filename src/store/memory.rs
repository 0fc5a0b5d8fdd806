//! In-memory store doubles for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{IdentityStore, InsertUserError, NewTask, Task, TaskStore, TaskUpdate, User};

#[derive(Default)]
pub struct MemoryIdentityStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User, InsertUserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(InsertUserError::UsernameTaken);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTaskStore {
    tasks: Mutex<Vec<Task>>,
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: NewTask) -> anyhow::Result<Task> {
        let stored = Task {
            id: Uuid::new_v4(),
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            allotted_to: task.allotted_to,
            done_by: task.done_by,
            status: task.status,
            start_time: task.start_time,
            end_time: task.end_time,
        };
        self.tasks.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<Option<Task>> {
        let tasks = self.tasks.lock().unwrap();
        Ok(tasks
            .iter()
            .find(|t| t.id == task_id && t.owner_id == owner_id)
            .cloned())
    }

    async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        fields: TaskUpdate,
    ) -> anyhow::Result<Option<Task>> {
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks
            .iter_mut()
            .find(|t| t.id == task_id && t.owner_id == owner_id)
        else {
            return Ok(None);
        };
        task.title = fields.title;
        task.description = fields.description;
        task.allotted_to = fields.allotted_to;
        task.done_by = fields.done_by;
        task.status = fields.status;
        task.end_time = fields.end_time;
        Ok(Some(task.clone()))
    }

    async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == task_id && t.owner_id == owner_id));
        Ok(tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn new_task(owner_id: Uuid) -> NewTask {
        NewTask {
            owner_id,
            title: "T".into(),
            description: "D".into(),
            allotted_to: "alice".into(),
            done_by: String::new(),
            status: "Pending".into(),
            start_time: OffsetDateTime::now_utc(),
            end_time: None,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryIdentityStore::default();
        store.insert("alice", "h1").await.unwrap();
        let err = store.insert("alice", "h2").await.unwrap_err();
        assert!(matches!(err, InsertUserError::UsernameTaken));
    }

    #[tokio::test]
    async fn operations_are_scoped_to_the_owner() {
        let store = MemoryTaskStore::default();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let task = store.insert(new_task(owner)).await.unwrap();

        assert!(store.find(stranger, task.id).await.unwrap().is_none());
        assert!(!store.delete(stranger, task.id).await.unwrap());
        assert!(store.find(owner, task.id).await.unwrap().is_some());
        assert!(store.delete(owner, task.id).await.unwrap());
        assert!(store.find(owner, task.id).await.unwrap().is_none());
    }
}
