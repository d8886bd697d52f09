pub mod project_service;
pub mod task_service;
pub mod user_service;

pub use project_service::{MemberView, ProjectService, ProjectWithOwner};
pub use task_service::{TaskService, TaskView};
pub use user_service::{ProfileUpdate, UserService, UserWithProjects};
