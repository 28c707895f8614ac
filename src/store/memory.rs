use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Task, TaskFilter, TaskPatch, User};

/// Process-local store backed by vectors. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    // Insertion order; listing walks it backwards.
    tasks: RwLock<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        let user = User::new(user);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, owner: Uuid, task: NewTask) -> Result<Task, AppError> {
        let task = Task::new(task, owner);
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == owner && filter.matches(t))
            .cloned()
            .collect())
    }

    async fn get_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: TaskPatch,
    ) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .map(|task| {
                task.apply(patch);
                task.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tasks.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: String::new(),
            due_date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            priority: TaskPriority::Medium,
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("ann@x.com")).await.unwrap();
        let second = store.insert_user(new_user("ann@x.com")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
        assert_eq!(store.user_count().await, 1);

        // Case-sensitive as stored.
        store.insert_user(new_user("Ann@x.com")).await.unwrap();
        assert_eq!(store.user_count().await, 2);
        assert!(store
            .find_user_by_email("ANN@X.COM")
            .await
            .unwrap()
            .is_none());
    }

    #[actix_rt::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let store = MemoryStore::new();
        let (ann, bob) = (Uuid::new_v4(), Uuid::new_v4());
        store.create(ann, new_task("first")).await.unwrap();
        store.create(bob, new_task("bob's")).await.unwrap();
        store.create(ann, new_task("second")).await.unwrap();

        let titles: Vec<_> = store
            .list_by_owner(ann, &TaskFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["second", "first"]);
    }

    #[actix_rt::test]
    async fn test_other_owner_sees_nothing() {
        let store = MemoryStore::new();
        let (ann, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let task = store.create(ann, new_task("private")).await.unwrap();

        assert!(store.get_owned(task.id, bob).await.unwrap().is_none());
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(store
            .update_owned(task.id, bob, patch)
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_owned(task.id, bob).await.unwrap());

        let still_there = store.get_owned(task.id, ann).await.unwrap().unwrap();
        assert_eq!(still_there, task);
    }

    #[actix_rt::test]
    async fn test_delete_twice() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let task = store.create(owner, new_task("gone")).await.unwrap();
        assert!(store.delete_owned(task.id, owner).await.unwrap());
        assert!(!store.delete_owned(task.id, owner).await.unwrap());
    }
}
