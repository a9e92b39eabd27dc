//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Trim and lowercase an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if an email address is syntactically valid
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    normalized.len() <= 254 && EMAIL_REGEX.is_match(&normalized)
}

/// Mask an email for logging: first character of the local part and the domain stay visible
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("  Maker.Name+shop@crafts.co.in "));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user example@example.com"));
        assert!(!is_valid_email("user@example"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("user@example.com"), "u***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
