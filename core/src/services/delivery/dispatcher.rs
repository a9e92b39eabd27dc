//! Delivery dispatcher routing codes to per-channel senders.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::domain::value_objects::{DeliveryChannel, DeliveryOutcome, DeliveryReport, Identifier};

use super::traits::DeliverySender;

/// Default bound on a single provider call
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide dispatcher built once at startup
///
/// Delivery is best-effort and independent per channel: one channel failing
/// never affects another, and nothing here touches the verification record.
pub struct DeliveryDispatcher {
    senders: HashMap<DeliveryChannel, Arc<dyn DeliverySender>>,
    timeout: Duration,
}

impl DeliveryDispatcher {
    /// Create a dispatcher with no senders
    pub fn new(timeout: Duration) -> Self {
        Self {
            senders: HashMap::new(),
            timeout,
        }
    }

    /// Register a sender for its channel, replacing any previous one
    pub fn with_sender(mut self, sender: Arc<dyn DeliverySender>) -> Self {
        self.senders.insert(sender.channel(), sender);
        self
    }

    pub fn has_channel(&self, channel: DeliveryChannel) -> bool {
        self.senders.contains_key(&channel)
    }

    /// Configured channels
    pub fn channels(&self) -> Vec<DeliveryChannel> {
        let mut channels: Vec<_> = self.senders.keys().copied().collect();
        channels.sort_by_key(|channel| channel.as_str());
        channels
    }

    /// Send a code over one channel
    ///
    /// Never fails: provider errors, timeouts and missing senders all become
    /// `DeliveryOutcome::Failed`.
    pub async fn send(
        &self,
        channel: DeliveryChannel,
        destination: &Identifier,
        code: &str,
    ) -> DeliveryOutcome {
        let Some(sender) = self.senders.get(&channel) else {
            warn!(
                channel = %channel,
                destination = %destination.masked(),
                event = "delivery_channel_missing",
                "No sender configured for channel"
            );
            return DeliveryOutcome::failed("channel not configured");
        };

        match tokio::time::timeout(self.timeout, sender.send(destination, code)).await {
            Ok(Ok(message_id)) => {
                info!(
                    channel = %channel,
                    destination = %destination.masked(),
                    message_id = %message_id,
                    event = "delivery_succeeded",
                    "Verification code delivered"
                );
                DeliveryOutcome::Delivered
            }
            Ok(Err(e)) => {
                warn!(
                    channel = %channel,
                    destination = %destination.masked(),
                    error = %e,
                    event = "delivery_failed",
                    "Verification code delivery failed"
                );
                DeliveryOutcome::failed(e.to_string())
            }
            Err(_) => {
                warn!(
                    channel = %channel,
                    destination = %destination.masked(),
                    timeout_secs = self.timeout.as_secs(),
                    event = "delivery_timeout",
                    "Verification code delivery timed out"
                );
                DeliveryOutcome::failed("delivery timed out")
            }
        }
    }

    /// Send a code to every destination concurrently, each over its own channel
    pub async fn dispatch_all(
        &self,
        destinations: &[Identifier],
        code: &str,
    ) -> Vec<DeliveryReport> {
        let sends = destinations.iter().map(|destination| async move {
            let channel = destination.channel();
            let outcome = self.send(channel, destination, code).await;
            DeliveryReport::new(channel, outcome)
        });

        join_all(sends).await
    }
}

impl Default for DeliveryDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DELIVERY_TIMEOUT)
    }
}
