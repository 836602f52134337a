//!
//! # Task Service
//!
//! Business rules for tasks: CRUD plus the ownership checks that cannot be
//! validated upstream. Existence is checked before ownership, so a missing
//! task is always 404 and a foreign task is always 403, regardless of who
//! asks.

use std::sync::Arc;

use crate::error::AppError;
use crate::models::{CreateTaskRequest, Task, TaskView, UpdateTaskRequest, User};
use crate::store::{TaskRepository, UserRepository};

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tasks, users }
    }

    async fn owner_of(&self, task: &Task) -> Result<User, AppError> {
        self.users
            .find_by_id(task.user_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Task {} has no owner", task.id)))
    }

    /// Creates a task for the user named in the payload and returns its
    /// projection.
    pub async fn create(&self, dto: CreateTaskRequest) -> Result<TaskView, AppError> {
        let owner = self
            .users
            .find_by_id(dto.user.value())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found with id {}", dto.user)))?;

        let task = self
            .tasks
            .save(Task {
                id: 0,
                title: dto.title,
                description: dto.description,
                status: dto.status,
                user_id: owner.id,
            })
            .await?;

        Ok(TaskView::project(&task, &owner))
    }

    /// All tasks, each projected with its owner.
    pub async fn find_all(&self) -> Result<Vec<TaskView>, AppError> {
        let tasks = self.tasks.find_all().await?;
        let mut views = Vec::with_capacity(tasks.len());
        for task in &tasks {
            let owner = self.owner_of(task).await?;
            views.push(TaskView::project(task, &owner));
        }
        Ok(views)
    }

    pub async fn find_one(&self, id: i64) -> Result<TaskView, AppError> {
        let task = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found with id {}", id)))?;
        let owner = self.owner_of(&task).await?;
        Ok(TaskView::project(&task, &owner))
    }

    /// Updates a task on behalf of `user_id`.
    ///
    /// Only the owning user may update. A reassignment to a user that does
    /// not exist silently keeps the current owner.
    pub async fn update(
        &self,
        user_id: i64,
        task_id: i64,
        dto: UpdateTaskRequest,
    ) -> Result<TaskView, AppError> {
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found with id {}", task_id)))?;

        if task.user_id != user_id {
            return Err(AppError::Forbidden(
                "You are not authorized to update this task".into(),
            ));
        }

        task.title = dto.title;
        task.description = dto.description;
        task.status = dto.status;
        if let Some(target) = dto.user {
            if let Some(new_owner) = self.users.find_by_id(target.value()).await? {
                task.user_id = new_owner.id;
            }
        }

        let task = self.tasks.save(task).await?;
        let owner = self.owner_of(&task).await?;
        Ok(TaskView::project(&task, &owner))
    }

    /// Deletes a task on behalf of `user_id`. Only the owning user may
    /// delete. Returns whether the delete happened.
    pub async fn remove(&self, task_id: i64, user_id: i64) -> Result<bool, AppError> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found with id {}", task_id)))?;

        if task.user_id != user_id {
            return Err(AppError::Forbidden(
                "You are not authorized to delete this task".into(),
            ));
        }

        self.tasks.delete(task.id).await
    }
}
