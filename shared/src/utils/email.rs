//! Email address utilities

use once_cell::sync::Lazy;
use regex::Regex;

// RFC-5322-lite address check: local part, exactly one @, dotted domain.
// Intentionally permissive about local-part characters; the mail server has
// the final word on deliverability.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$").unwrap()
});

/// Normalize an email address by trimming surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

/// Check if an email address is syntactically valid
pub fn is_valid_email(email: &str) -> bool {
    let normalized = normalize_email(email);
    !normalized.is_empty() && normalized.len() <= 254 && EMAIL_REGEX.is_match(&normalized)
}

/// Mask an email address for display and logging (e.g. `jo****@example.com`)
pub fn mask_email(email: &str) -> String {
    let normalized = normalize_email(email);
    match normalized.split_once('@') {
        Some((local, domain)) if local.chars().count() > 2 => {
            let prefix: String = local.chars().take(2).collect();
            format!("{}****@{}", prefix, domain)
        }
        Some((_, domain)) => format!("****@{}", domain),
        None => "****".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  user@example.com "), "user@example.com");
        assert_eq!(normalize_email("\tuser@example.com\n"), "user@example.com");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(is_valid_email("  padded@example.com  "));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("   "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@domain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("user@-example.com"));
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("johndoe@example.com"), "jo****@example.com");
        assert_eq!(mask_email("jo@example.com"), "****@example.com");
        assert_eq!(mask_email("not-an-email"), "****");
    }
}
