// handlers/protected/projects/mod.rs - /api/projects

pub mod collection;
pub mod members;
pub mod record;
pub mod tasks;

pub use collection::{count_projects, create_project, list_projects, my_projects};
pub use members::{assign_members, list_members};
pub use record::{delete_project, get_project, update_project};
pub use tasks::{create_project_task, list_project_tasks};
