//! Common utility functions

pub mod email;
pub mod phone;

pub use email::{is_valid_email, mask_email, normalize_email};
pub use phone::{is_valid_phone, looks_like_phone, mask_phone_number, normalize_phone_number};
