//! Out-of-band code delivery configuration (email and SMS providers)

use serde::{Deserialize, Serialize};

/// Email provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log the message instead of sending it
    Mock,
    /// Brevo transactional email API
    Brevo,
    /// Email channel disabled
    Disabled,
}

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log the message instead of sending it
    Mock,
    /// Twilio programmable messaging
    Twilio,
    /// SMS channel disabled
    Disabled,
}

/// Brevo credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BrevoConfig {
    pub api_key: String,
    pub sender_email: String,
    #[serde(default)]
    pub sender_name: Option<String>,
    #[serde(default = "default_brevo_endpoint")]
    pub endpoint: String,
}

/// Twilio credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number in E.164 format
    pub from_number: String,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Delivery dispatcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    pub email_provider: EmailProvider,
    pub sms_provider: SmsProvider,
    #[serde(default)]
    pub brevo: BrevoConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    /// Per-channel send timeout in seconds
    #[serde(default = "default_delivery_timeout")]
    pub timeout_secs: u64,
    /// Shown in message bodies
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            email_provider: EmailProvider::Mock,
            sms_provider: SmsProvider::Mock,
            brevo: BrevoConfig {
                endpoint: default_brevo_endpoint(),
                ..Default::default()
            },
            twilio: TwilioConfig {
                max_retries: default_max_retries(),
                retry_delay_ms: default_retry_delay_ms(),
                ..Default::default()
            },
            timeout_secs: default_delivery_timeout(),
            app_name: default_app_name(),
        }
    }
}

impl DeliveryConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let email_provider = match std::env::var("EMAIL_PROVIDER").as_deref() {
            Ok("brevo") => EmailProvider::Brevo,
            Ok("disabled") | Ok("none") => EmailProvider::Disabled,
            _ => EmailProvider::Mock,
        };
        let sms_provider = match std::env::var("SMS_PROVIDER").as_deref() {
            Ok("twilio") => SmsProvider::Twilio,
            Ok("disabled") | Ok("none") => SmsProvider::Disabled,
            _ => SmsProvider::Mock,
        };

        Self {
            email_provider,
            sms_provider,
            brevo: BrevoConfig {
                api_key: std::env::var("BREVO_API_KEY").unwrap_or_default(),
                sender_email: std::env::var("BREVO_SENDER_EMAIL").unwrap_or_default(),
                sender_name: std::env::var("BREVO_SENDER_NAME").ok(),
                endpoint: std::env::var("BREVO_ENDPOINT").unwrap_or(defaults.brevo.endpoint),
            },
            twilio: TwilioConfig {
                account_sid: std::env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
                auth_token: std::env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
                from_number: std::env::var("TWILIO_FROM_NUMBER").unwrap_or_default(),
                max_retries: std::env::var("TWILIO_MAX_RETRIES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.twilio.max_retries),
                retry_delay_ms: std::env::var("TWILIO_RETRY_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.twilio.retry_delay_ms),
            },
            timeout_secs: std::env::var("DELIVERY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            app_name: std::env::var("APP_NAME").unwrap_or(defaults.app_name),
        }
    }
}

fn default_brevo_endpoint() -> String {
    String::from("https://api.brevo.com/v3/smtp/email")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_delivery_timeout() -> u64 {
    10
}

fn default_app_name() -> String {
    String::from("CraftConnect")
}
