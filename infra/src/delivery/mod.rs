//! Code delivery providers
//!
//! Implementations of `cc_core::services::DeliverySender`:
//!
//! - **Mock**: prints codes to the console for development
//! - **Brevo**: transactional email over HTTPS
//! - **Twilio**: SMS (behind the `twilio-sms` feature)

pub mod brevo;
pub mod message;
pub mod mock;

#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use brevo::BrevoEmailSender;
pub use message::CodeMessage;
pub use mock::MockDeliverySender;

#[cfg(feature = "twilio-sms")]
pub use twilio::TwilioSmsSender;
