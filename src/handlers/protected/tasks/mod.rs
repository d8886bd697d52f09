// handlers/protected/tasks/mod.rs - /api/tasks

pub mod assign;
pub mod collection;
pub mod record;

pub use assign::assign_task;
pub use collection::list_tasks;
pub use record::{delete_task, get_task, update_task};
