//! Delivery of one-time codes over email and SMS
//!
//! The core only depends on the `DeliverySender` port. Concrete providers live
//! in the infrastructure crate.

mod dispatcher;
mod recording;
mod traits;


pub use dispatcher::{DeliveryDispatcher, DEFAULT_DELIVERY_TIMEOUT};
pub use recording::{RecordingDeliverySender, SentCode};
pub use traits::DeliverySender;
