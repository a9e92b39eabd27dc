//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// E.164: leading '+', non-zero country digit, 10-15 digits in total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{9,14}$").expect("valid E.164 regex")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is valid international E.164 after normalization
pub fn is_valid_phone(phone: &str) -> bool {
    let normalized = normalize_phone_number(phone);
    E164_REGEX.is_match(&normalized)
}

/// Whether the raw input looks like a phone number rather than an email
pub fn looks_like_phone(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'))
}

/// Mask a phone number for logging, keeping only the last four digits
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() <= 4 {
        return "*".repeat(normalized.len());
    }

    let visible = &normalized[normalized.len() - 4..];
    if normalized.starts_with('+') {
        format!("+{}{}", "*".repeat(normalized.len() - 5), visible)
    } else {
        format!("{}{}", "*".repeat(normalized.len() - 4), visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+91 98765-43210"), "+919876543210");
        assert_eq!(normalize_phone_number("(415) 555-2671"), "4155552671");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+919876543210"));
        assert!(is_valid_phone("+1 415 555 2671"));
        assert!(is_valid_phone("+442071838750"));
        assert!(!is_valid_phone("9876543210")); // Missing +
        assert!(!is_valid_phone("+0123456789")); // Invalid country code
        assert!(!is_valid_phone("+12345")); // Too short
        assert!(!is_valid_phone("+1234567890123456")); // Too long
    }

    #[test]
    fn test_looks_like_phone() {
        assert!(looks_like_phone("+91 98765 43210"));
        assert!(!looks_like_phone("user@example.com"));
        assert!(!looks_like_phone("   "));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+919876543210"), "+********3210");
        assert_eq!(mask_phone_number("4155552671"), "******2671");
        assert_eq!(mask_phone_number("123"), "***");
    }
}
