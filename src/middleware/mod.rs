pub mod auth;
pub mod guard;

pub use auth::{authenticate, extract_token, require_auth, AuthRejection};
pub use guard::{RoleGuard, RoleGuardService};
