// handlers/public/mod.rs - endpoints reachable without a session token

pub mod auth;
