//! Brevo transactional email sender
//!
//! Posts to the `/v3/smtp/email` endpoint with the account API key.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use cc_core::domain::value_objects::{DeliveryChannel, Identifier};
use cc_core::errors::{DomainError, DomainResult};
use cc_core::services::DeliverySender;
use cc_shared::config::delivery::BrevoConfig;

use crate::InfrastructureError;

use super::message::CodeMessage;

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: String,
    html_content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

pub struct BrevoEmailSender {
    client: Client,
    config: BrevoConfig,
    message: CodeMessage,
}

impl BrevoEmailSender {
    pub fn new(
        config: BrevoConfig,
        message: CodeMessage,
        timeout: Duration,
    ) -> Result<Self, InfrastructureError> {
        if config.api_key.is_empty() {
            return Err(InfrastructureError::Config("BREVO_API_KEY not set".to_string()));
        }
        if config.sender_email.is_empty() {
            return Err(InfrastructureError::Config(
                "BREVO_SENDER_EMAIL not set".to_string(),
            ));
        }

        let client = Client::builder().timeout(timeout).build()?;

        info!(
            sender = %cc_shared::email::mask_email(&config.sender_email),
            "Brevo email sender initialized"
        );

        Ok(Self {
            client,
            config,
            message,
        })
    }

    fn request_body<'a>(&'a self, to: &'a str, code: &str) -> SendEmailRequest<'a> {
        SendEmailRequest {
            sender: Contact {
                email: &self.config.sender_email,
                name: self.config.sender_name.as_deref(),
            },
            to: vec![Contact { email: to, name: None }],
            subject: self.message.subject(),
            html_content: self.message.html(code),
        }
    }
}

#[async_trait]
impl DeliverySender for BrevoEmailSender {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::Email
    }

    async fn send(&self, destination: &Identifier, code: &str) -> DomainResult<String> {
        if !destination.is_email() {
            return Err(DomainError::Dispatch {
                message: "email channel needs an email destination".to_string(),
            });
        }
        let to = destination.as_str();

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&self.request_body(to, code))
            .send()
            .await
            .map_err(InfrastructureError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = status.as_u16(),
                destination = %destination.masked(),
                "Brevo rejected email"
            );
            let message = format!("Brevo returned {}: {}", status, body);
            return Err(InfrastructureError::Delivery(message).into());
        }

        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_default();

        info!(
            provider = "brevo",
            destination = %destination.masked(),
            message_id = %message_id,
            "Verification email sent"
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BrevoConfig {
        BrevoConfig {
            api_key: "xkeysib-test".to_string(),
            sender_email: "no-reply@craftconnect.in".to_string(),
            sender_name: Some("CraftConnect".to_string()),
            endpoint: "https://api.brevo.com/v3/smtp/email".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let sender = BrevoEmailSender::new(config(), CodeMessage::default(), Duration::from_secs(5))
            .unwrap();
        let body =
            serde_json::to_value(sender.request_body("maker@example.com", "482913")).unwrap();

        assert_eq!(body["sender"]["email"], "no-reply@craftconnect.in");
        assert_eq!(body["sender"]["name"], "CraftConnect");
        assert_eq!(body["to"][0]["email"], "maker@example.com");
        assert!(body["to"][0].get("name").is_none());
        assert_eq!(body["subject"], "Your CraftConnect verification code");
        assert!(body["htmlContent"].as_str().unwrap().contains("482913"));
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut missing_key = config();
        missing_key.api_key.clear();
        assert!(matches!(
            BrevoEmailSender::new(missing_key, CodeMessage::default(), Duration::from_secs(5)),
            Err(InfrastructureError::Config(_))
        ));

        let mut missing_sender = config();
        missing_sender.sender_email.clear();
        let result =
            BrevoEmailSender::new(missing_sender, CodeMessage::default(), Duration::from_secs(5));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_phone_destination_is_a_dispatch_error() {
        let sender = BrevoEmailSender::new(config(), CodeMessage::default(), Duration::from_secs(5))
            .unwrap();
        let phone = Identifier::parse("+919876543210").unwrap();

        let err = sender.send(&phone, "482913").await.unwrap_err();
        assert!(matches!(err, DomainError::Dispatch { .. }));
    }
}
