pub mod project;
pub mod task;
pub mod user;

pub use project::{Project, ProjectMember, ProjectSummary};
pub use task::Task;
pub use user::{User, UserInfo, UserSummary};
