//! Trait for out-of-band code delivery providers

use async_trait::async_trait;

use crate::domain::value_objects::{DeliveryChannel, Identifier};
use crate::errors::DomainResult;

/// A provider able to deliver a one-time code over one channel
#[async_trait]
pub trait DeliverySender: Send + Sync {
    /// Channel this sender serves
    fn channel(&self) -> DeliveryChannel;

    /// Deliver `code` to `destination`
    ///
    /// Returns a provider message id. Failures are `DomainError::Dispatch`.
    async fn send(&self, destination: &Identifier, code: &str) -> DomainResult<String>;
}
