// handlers/mod.rs - handlers grouped by the access they require
//
// public    - no token (/api/auth/signup, /signin, /signout)
// protected - any authenticated caller; some routes add an ADMIN guard in app.rs
// elevated  - ADMIN-only user administration (/api/auth/users*)

pub mod elevated;
pub mod protected;
pub mod public;
