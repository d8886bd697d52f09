// handlers/elevated/users/mod.rs - /api/auth/users

pub mod count;
pub mod create;
pub mod list;

pub use count::count_users;
pub use create::create_user;
pub use list::list_users;
