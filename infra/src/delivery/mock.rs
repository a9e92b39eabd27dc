//! Console delivery for development
//!
//! Prints the code to stdout instead of contacting a provider, so local
//! signups can be completed without email or SMS credentials.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use cc_core::domain::value_objects::{DeliveryChannel, Identifier};
use cc_core::errors::DomainResult;
use cc_core::services::DeliverySender;

use super::message::CodeMessage;

#[derive(Clone)]
pub struct MockDeliverySender {
    channel: DeliveryChannel,
    message: CodeMessage,
    sent_count: Arc<AtomicU64>,
    /// Print the full message to stdout
    console_output: bool,
}

impl MockDeliverySender {
    pub fn new(channel: DeliveryChannel, message: CodeMessage) -> Self {
        Self {
            channel,
            message,
            sent_count: Arc::new(AtomicU64::new(0)),
            console_output: true,
        }
    }

    /// Log only, without the console banner
    pub fn quiet(channel: DeliveryChannel, message: CodeMessage) -> Self {
        Self {
            console_output: false,
            ..Self::new(channel, message)
        }
    }

    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliverySender for MockDeliverySender {
    fn channel(&self) -> DeliveryChannel {
        self.channel
    }

    async fn send(&self, destination: &Identifier, code: &str) -> DomainResult<String> {
        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.sent_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            let body = match self.channel {
                DeliveryChannel::Email => self.message.subject() + ": " + code,
                DeliveryChannel::Sms => self.message.sms_text(code),
            };
            println!("\n{}", "=".repeat(60));
            println!("MOCK {} DELIVERY - MESSAGE #{}", self.channel.as_str().to_uppercase(), count);
            println!("{}", "=".repeat(60));
            println!("To: {}", destination);
            println!("Message ID: {}", message_id);
            println!("Content: {}", body);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "delivery",
            provider = "mock",
            channel = %self.channel,
            destination = %destination.masked(),
            message_id = %message_id,
            "Verification code delivered (mock)"
        );

        Ok(message_id)
    }
}
