//! Recording sender for development and tests

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::domain::value_objects::{DeliveryChannel, Identifier};
use crate::errors::{DomainError, DomainResult};

use super::traits::DeliverySender;

/// A code handed to a `RecordingDeliverySender`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCode {
    pub destination: Identifier,
    pub code: String,
}

/// Sender that keeps every delivered code in memory
///
/// Can be told to fail or to stall, to exercise per-channel isolation.
#[derive(Clone)]
pub struct RecordingDeliverySender {
    channel: DeliveryChannel,
    sent: Arc<Mutex<Vec<SentCode>>>,
    should_fail: bool,
    delay: Option<Duration>,
}

impl RecordingDeliverySender {
    pub fn new(channel: DeliveryChannel) -> Self {
        Self {
            channel,
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
            delay: None,
        }
    }

    /// A sender whose every call fails with a dispatch error
    pub fn failing(channel: DeliveryChannel) -> Self {
        Self {
            should_fail: true,
            ..Self::new(channel)
        }
    }

    /// Delay every call, e.g. to trigger the dispatcher timeout
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All codes delivered so far
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Last code delivered to `destination`
    pub fn last_code_for(&self, destination: &Identifier) -> Option<String> {
        self.sent()
            .into_iter()
            .rev()
            .find(|sent| &sent.destination == destination)
            .map(|sent| sent.code)
    }
}

#[async_trait]
impl DeliverySender for RecordingDeliverySender {
    fn channel(&self) -> DeliveryChannel {
        self.channel
    }

    async fn send(&self, destination: &Identifier, code: &str) -> DomainResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail {
            return Err(DomainError::Dispatch {
                message: format!("{} provider unavailable", self.channel),
            });
        }

        let mut sent = self.sent.lock().map_err(|_| DomainError::Internal {
            message: "recording sender lock poisoned".to_string(),
        })?;
        sent.push(SentCode {
            destination: destination.clone(),
            code: code.to_string(),
        });

        Ok(format!("recorded-{}-{}", self.channel, sent.len()))
    }
}
