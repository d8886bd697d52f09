// handlers/public/auth/mod.rs - account creation and session cookie management

pub mod signin;
pub mod signout;
pub mod signup;
pub mod utils;

pub use signin::signin;
pub use signout::signout;
pub use signup::{signup, SignupRequest};
