//! Delivery channel and per-channel outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Out-of-band channel a one-time code is sent over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Email,
    Sms,
}

impl DeliveryChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Delivered => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

/// Outcome of one channel in a verification dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub channel: DeliveryChannel,
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    pub fn new(channel: DeliveryChannel, outcome: DeliveryOutcome) -> Self {
        Self { channel, outcome }
    }
}
