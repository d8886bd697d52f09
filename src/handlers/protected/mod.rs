// handlers/protected/mod.rs - endpoints behind the authentication middleware
//
// Every handler here receives the caller's Identity. Routes that change
// shared state (project update/delete/assign, task delete) are additionally
// wrapped in RoleGuard::admin_only() when the router is assembled.

pub mod auth;
pub mod projects;
pub mod tasks;
