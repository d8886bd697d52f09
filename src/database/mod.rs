pub mod manager;
pub mod models;
pub mod postgres;
pub mod store;

use thiserror::Error;

pub use manager::DatabaseManager;
pub use postgres::PgStore;
pub use store::{
    NewProject, NewTask, NewUser, Page, ProjectChanges, ProjectStore, Store, TaskChanges, TaskStore,
    UserChanges, UserStore,
};

/// Errors from the credential store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("{0}")]
    NotFound(String),

    /// Unique email constraint hit on insert or update
    #[error("Email already in use")]
    DuplicateEmail,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
