//! Basic format checks applied to credentials before the identity store is consulted.

use crate::types::{AppError, FieldError, Result};

const MAX_EMAIL_LENGTH: usize = 256;

/// Checks that both fields are present and the email looks like an address.
///
/// All problems are collected so the caller sees every failing field at once.
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if email.trim().is_empty() {
        errors.push(FieldError::field("email", "The Email field is required."));
    } else if email.chars().count() > MAX_EMAIL_LENGTH {
        errors.push(FieldError::field(
            "email",
            format!("The Email field must be at most {} characters.", MAX_EMAIL_LENGTH),
        ));
    } else if !is_email(email) {
        errors.push(FieldError::field(
            "email",
            "The Email field is not a valid e-mail address.",
        ));
    }

    if password.is_empty() {
        errors.push(FieldError::field("password", "The Password field is required."));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(result: Result<()>) -> Vec<FieldError> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_credentials() {
        assert!(validate_credentials("a@x.com", "Pw1!").is_ok());
        assert!(validate_credentials("first.last+tag@sub.example.org", "x").is_ok());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let errors = field_errors(validate_credentials("", ""));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field.as_deref(), Some("email"));
        assert_eq!(errors[1].field.as_deref(), Some("password"));
    }

    #[test]
    fn test_malformed_emails() {
        for email in [
            "notanemail",
            "@x.com",
            "a@",
            "a@x",
            "a@.com",
            "a@x.",
            "a b@x.com",
            "a@b@x.com",
        ] {
            let errors = field_errors(validate_credentials(email, "Pw1!"));
            assert_eq!(errors.len(), 1, "{email} should be rejected");
            assert!(errors[0].message.contains("not a valid e-mail"));
        }
    }

    #[test]
    fn test_overlong_email() {
        let email = format!("{}@x.com", "a".repeat(300));
        let errors = field_errors(validate_credentials(&email, "Pw1!"));
        assert!(errors[0].message.contains("at most"));
    }

    #[test]
    fn test_email_length_counts_characters() {
        // 250 two-byte characters plus "@x.com": 256 characters, 506 bytes
        let at_limit = format!("{}@x.com", "é".repeat(250));
        assert_eq!(at_limit.chars().count(), MAX_EMAIL_LENGTH);
        assert!(at_limit.len() > MAX_EMAIL_LENGTH);
        assert!(validate_credentials(&at_limit, "Pw1!").is_ok());

        let over = format!("{}@x.com", "é".repeat(251));
        let errors = field_errors(validate_credentials(&over, "Pw1!"));
        assert!(errors[0].message.contains("at most 256"));
    }
}
