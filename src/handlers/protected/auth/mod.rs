// handlers/protected/auth/mod.rs - the caller's own account

pub mod me;
pub mod profile;

pub use me::me;
pub use profile::update_profile;
