//!
//! # Storage Abstraction
//!
//! The persistent store is an external collaborator: the domain layer only
//! sees one repository trait per entity and never touches query
//! construction. [`MemoryStore`] backs the binaries and the test suite; any
//! storage engine can stand in by implementing the same traits.
//!
//! Each repository operation is individually atomic, but nothing spans the
//! read-check-write sequence in update/remove. Two concurrent updates to
//! the same task can both pass the ownership check and then overwrite each
//! other; this is documented best-effort behavior.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use crate::error::AppError;
use crate::models::{Task, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Persists a user. An id of 0 means insert; the store assigns the id.
    /// Emails are unique: inserting a duplicate fails with `BadRequest`.
    async fn save(&self, user: User) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, AppError>;
    async fn find_all(&self) -> Result<Vec<Task>, AppError>;
    /// Persists a task. An id of 0 means insert; the store assigns the id.
    async fn save(&self, task: Task) -> Result<Task, AppError>;
    /// Deletes a task, reporting whether it existed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// In-memory store implementing both repositories.
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<i64, User>>,
    tasks: Mutex<HashMap<i64, Task>>,
    next_user_id: AtomicI64,
    next_task_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> AppError {
        AppError::Internal("Store lock poisoned".into())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let users = self.users.lock().map_err(|_| Self::lock_poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().map_err(|_| Self::lock_poisoned())?;
        Ok(users.values().find(|user| user.email == email).cloned())
    }

    async fn save(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().map_err(|_| Self::lock_poisoned())?;

        let duplicate = users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id);
        if duplicate {
            return Err(AppError::BadRequest("Email already registered".into()));
        }

        if user.id == 0 {
            user.id = self.next_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.lock().map_err(|_| Self::lock_poisoned())?;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, AppError> {
        let tasks = self.tasks.lock().map_err(|_| Self::lock_poisoned())?;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by_key(|task| task.id);
        Ok(all)
    }

    async fn save(&self, mut task: Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.lock().map_err(|_| Self::lock_poisoned())?;
        if task.id == 0 {
            task.id = self.next_task_id.fetch_add(1, Ordering::SeqCst) + 1;
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tasks = self.tasks.lock().map_err(|_| Self::lock_poisoned())?;
        Ok(tasks.remove(&id).is_some())
    }
}
