pub mod id;
pub mod task;
pub mod user;

pub use id::NumericId;
pub use task::{
    CreateTaskRequest, RemoveTaskPayload, Task, TaskStatus, TaskView, UpdateTaskPayload,
    UpdateTaskRequest,
};
pub use user::{CreateUserRequest, LoginRequest, TokenResponse, User, UserView};
