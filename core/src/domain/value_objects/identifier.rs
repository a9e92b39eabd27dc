//! Account identifier value object.
//!
//! An identifier is either an email address or an E.164 phone number. Raw input
//! is classified and normalized once at the boundary; everything past that point
//! works with the typed value.

use std::fmt;
use std::str::FromStr;

use cc_shared::utils::{email, phone};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

use super::delivery::DeliveryChannel;

/// Email address or phone number a one-time code is issued against
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Identifier {
    /// Lowercased email address
    Email(String),
    /// Phone number in E.164 form, e.g. `+919876543210`
    Phone(String),
}

impl Identifier {
    /// Classify and normalize raw input
    ///
    /// Anything containing `@` is treated as an email address. Input made only of
    /// digits and phone punctuation is treated as a phone number. Everything else
    /// is rejected.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "identifier".to_string(),
            });
        }

        if trimmed.contains('@') {
            Self::email(trimmed)
        } else if phone::looks_like_phone(trimmed) {
            Self::phone(trimmed)
        } else {
            Err(ValidationError::InvalidIdentifier)
        }
    }

    /// Build an email identifier
    pub fn email(raw: &str) -> Result<Self, ValidationError> {
        if !email::is_valid_email(raw) {
            return Err(ValidationError::InvalidIdentifier);
        }
        Ok(Self::Email(email::normalize_email(raw)))
    }

    /// Build a phone identifier
    pub fn phone(raw: &str) -> Result<Self, ValidationError> {
        if !phone::is_valid_phone(raw) {
            return Err(ValidationError::InvalidIdentifier);
        }
        Ok(Self::Phone(phone::normalize_phone_number(raw)))
    }

    /// Normalized string form, used as the storage key
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(value) | Self::Phone(value) => value,
        }
    }

    /// Channel a code for this identifier is delivered over
    pub fn channel(&self) -> DeliveryChannel {
        match self {
            Self::Email(_) => DeliveryChannel::Email,
            Self::Phone(_) => DeliveryChannel::Sms,
        }
    }

    pub fn is_email(&self) -> bool {
        matches!(self, Self::Email(_))
    }

    pub fn is_phone(&self) -> bool {
        matches!(self, Self::Phone(_))
    }

    /// Masked form safe for logs
    pub fn masked(&self) -> String {
        match self {
            Self::Email(value) => email::mask_email(value),
            Self::Phone(value) => phone::mask_phone_number(value),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        match identifier {
            Identifier::Email(value) | Identifier::Phone(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_email_is_trimmed_and_lowercased() {
        let id = Identifier::parse("  User@Example.COM ").unwrap();
        assert_eq!(id, Identifier::Email("user@example.com".to_string()));
        assert_eq!(id.channel(), DeliveryChannel::Email);
    }

    #[test]
    fn test_parse_phone_strips_formatting() {
        let id = Identifier::parse("+91 98765-43210").unwrap();
        assert_eq!(id, Identifier::Phone("+919876543210".to_string()));
        assert_eq!(id.channel(), DeliveryChannel::Sms);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Identifier::parse("not an identifier"),
            Err(ValidationError::InvalidIdentifier)
        );
        assert_eq!(
            Identifier::parse("9876543210"),
            Err(ValidationError::InvalidIdentifier)
        );
        assert_eq!(Identifier::parse("user@"), Err(ValidationError::InvalidIdentifier));
        assert!(matches!(
            Identifier::parse("   "),
            Err(ValidationError::RequiredField { .. })
        ));
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let id = Identifier::parse("maker@craftconnect.in").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"maker@craftconnect.in\"");

        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<Identifier>("\"nonsense\"").is_err());
    }

    #[test]
    fn test_masked() {
        let id = Identifier::parse("maker@craftconnect.in").unwrap();
        assert_eq!(id.masked(), "m***@craftconnect.in");

        let id = Identifier::parse("+919876543210").unwrap();
        assert_eq!(id.masked(), "+********3210");
    }
}
