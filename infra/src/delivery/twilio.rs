//! Twilio SMS sender
//!
//! Destinations are validated as E.164 with `phonenumber` before being handed
//! to Twilio. Server-side and rate-limit failures are retried with
//! exponential backoff; client errors are not.

use async_trait::async_trait;
use phonenumber::{Mode, PhoneNumber};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use twilio::{Client, OutboundMessage};

use cc_core::domain::value_objects::{DeliveryChannel, Identifier};
use cc_core::errors::DomainResult;
use cc_core::services::DeliverySender;
use cc_shared::config::delivery::TwilioConfig;
use cc_shared::phone::mask_phone_number;

use crate::InfrastructureError;

use super::message::CodeMessage;

pub struct TwilioSmsSender {
    client: Client,
    config: TwilioConfig,
    message: CodeMessage,
}

impl TwilioSmsSender {
    pub fn new(config: TwilioConfig, message: CodeMessage) -> Result<Self, InfrastructureError> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set".to_string(),
            ));
        }
        if !config.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_FROM_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }

        let client = Client::new(&config.account_sid, &config.auth_token);

        info!(
            from = %mask_phone_number(&config.from_number),
            "Twilio SMS sender initialized"
        );

        Ok(Self {
            client,
            config,
            message,
        })
    }

    async fn send_with_retry(&self, to: &str, body: &str) -> Result<String, InfrastructureError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;
            debug!(
                attempt = attempts,
                max_attempts,
                to = %mask_phone_number(to),
                "Sending SMS"
            );

            let outbound = OutboundMessage::new(&self.config.from_number, to, body);
            match self.client.send_message(outbound).await {
                Ok(response) => {
                    info!(
                        provider = "twilio",
                        to = %mask_phone_number(to),
                        sid = %response.sid,
                        "Verification SMS sent"
                    );
                    return Ok(response.sid);
                }
                Err(e) => {
                    let reason = e.to_string();
                    error!(attempt = attempts, max_attempts, error = %reason, "Failed to send SMS");

                    if attempts >= max_attempts || !is_retryable_failure(&reason) {
                        return Err(InfrastructureError::Delivery(format!(
                            "Twilio send failed after {} attempt(s): {}",
                            attempts, reason
                        )));
                    }

                    warn!("Retrying SMS in {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

/// Normalize a destination to E.164, rejecting numbers `phonenumber` cannot parse
pub fn to_e164(phone: &str) -> Result<String, InfrastructureError> {
    phone
        .parse::<PhoneNumber>()
        .map(|parsed| parsed.format().mode(Mode::E164).to_string())
        .map_err(|e| InfrastructureError::Delivery(format!("Invalid phone number format: {}", e)))
}

/// Rate limiting and 5xx responses are worth another try
fn is_retryable_failure(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    ["429", "rate", "500", "502", "503", "504", "timed out"]
        .iter()
        .any(|marker| reason.contains(marker))
}

#[async_trait]
impl DeliverySender for TwilioSmsSender {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::Sms
    }

    async fn send(&self, destination: &Identifier, code: &str) -> DomainResult<String> {
        if !destination.is_phone() {
            return Err(InfrastructureError::Delivery(
                "SMS channel needs a phone destination".to_string(),
            )
            .into());
        }
        let to = to_e164(destination.as_str())?;
        let sid = self.send_with_retry(&to, &self.message.sms_text(code)).await?;
        Ok(sid)
    }
}
