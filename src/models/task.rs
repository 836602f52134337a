use serde::{Deserialize, Serialize};
use validator::Validate;

use super::id::NumericId;
use super::user::{User, UserView};

/// The fixed set of task states. Serialized in its wire form
/// (`TO_DO` / `IN_PROGRESS` / `DONE`), each well under the 15-character
/// column bound.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    ToDo,
    InProgress,
    Done,
}

/// A task as held by the administrator service. Ownership is a plain user
/// id; the owner is joined in when projecting to [`TaskView`].
#[derive(Debug, Clone)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Id of the owning user.
    pub user_id: i64,
}

/// Payload for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    /// Id of the user the task is created for.
    pub user: NumericId,
}

/// Payload for updating a task. Carries the task id in the body; the
/// requesting user travels separately (query parameter on the public
/// surface, `userId` in the internal command payload).
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    pub id: NumericId,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 255))]
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    /// Optional reassignment target. If the named user does not exist the
    /// task keeps its current owner; no error is raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NumericId>,
}

/// Internal command payload for `updateTask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskPayload {
    #[serde(rename = "userId")]
    pub user_id: NumericId,
    pub task: UpdateTaskRequest,
}

/// Internal command payload for `removeTask`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveTaskPayload {
    #[serde(rename = "taskId")]
    pub task_id: NumericId,
    #[serde(rename = "userId")]
    pub user_id: NumericId,
}

/// The outward projection of a task, owner included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub user: UserView,
}

impl TaskView {
    pub fn project(task: &Task, owner: &User) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            user: UserView::from(owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_wire_form() {
        assert_eq!(serde_json::to_value(TaskStatus::ToDo).unwrap(), "TO_DO");
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            "IN_PROGRESS"
        );
        assert_eq!(serde_json::to_value(TaskStatus::Done).unwrap(), "DONE");

        let status: TaskStatus = serde_json::from_value(json!("IN_PROGRESS")).unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert!(serde_json::from_value::<TaskStatus>(json!("WAITING")).is_err());
    }

    #[test]
    fn test_create_task_request_validation() {
        let valid = CreateTaskRequest {
            title: "T1".to_string(),
            description: "d".to_string(),
            status: TaskStatus::ToDo,
            user: NumericId(1),
        };
        assert!(valid.validate().is_ok());

        let empty_title = CreateTaskRequest {
            title: "".to_string(),
            description: "d".to_string(),
            status: TaskStatus::ToDo,
            user: NumericId(1),
        };
        assert!(empty_title.validate().is_err());

        let long_title = CreateTaskRequest {
            title: "a".repeat(101),
            description: "d".to_string(),
            status: TaskStatus::ToDo,
            user: NumericId(1),
        };
        assert!(long_title.validate().is_err());

        let long_description = CreateTaskRequest {
            title: "T1".to_string(),
            description: "b".repeat(256),
            status: TaskStatus::ToDo,
            user: NumericId(1),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_update_payload_coerces_string_ids() {
        // Query parameters arrive as strings; the payload still decodes.
        let payload: UpdateTaskPayload = serde_json::from_value(json!({
            "userId": "3",
            "task": {
                "id": 9,
                "title": "T1",
                "description": "d",
                "status": "DONE",
            }
        }))
        .unwrap();

        assert_eq!(payload.user_id.value(), 3);
        assert_eq!(payload.task.id.value(), 9);
        assert!(payload.task.user.is_none());
    }

    #[test]
    fn test_projection_includes_owner_without_credential() {
        let owner = User {
            id: 2,
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            password: "$2b$12$digest".to_string(),
        };
        let task = Task {
            id: 5,
            title: "T1".to_string(),
            description: "d".to_string(),
            status: TaskStatus::ToDo,
            user_id: 2,
        };

        let view = TaskView::project(&task, &owner);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["user"]["id"], 2);
        assert!(json["user"].get("password").is_none());
    }
}
