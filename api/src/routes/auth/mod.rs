//! Authentication route handlers
//!
//! - One-time code issuance and confirmation
//! - Signup (pending account plus first code)
//! - Password login for activated accounts

pub mod login;
pub mod send_otp;
pub mod signup;
pub mod verify_otp;

pub use login::login;
pub use send_otp::send_otp;
pub use signup::signup;
pub use verify_otp::verify_otp;
