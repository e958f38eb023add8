use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

/// Input validation for account registration

// Patterns are literals; a failure here is a source bug
static FIRST_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z ]+$").expect("hardcoded first name regex is invalid"));

static LAST_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").expect("hardcoded last name regex is invalid"));

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("hardcoded username regex is invalid"));

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("hardcoded email regex is invalid"));

pub const MIN_NAME_LETTERS: usize = 2;
pub const MIN_USERNAME_LEN: usize = 6;
pub const MIN_PASSWORD_LEN: usize = 6;

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn blank() -> ValidationError {
    field_error("blank", "can't be blank")
}

fn letter_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_alphabetic()).count()
}

/// Letters and spaces, at least two letters
pub fn validate_first_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(blank());
    }
    if !FIRST_NAME_REGEX.is_match(value) {
        return Err(field_error("invalid", "is invalid"));
    }
    if letter_count(value) < MIN_NAME_LETTERS {
        return Err(field_error("too_short", "must have at least 2 letters"));
    }
    Ok(())
}

/// Letters only, at least two
pub fn validate_last_name(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(blank());
    }
    if !LAST_NAME_REGEX.is_match(value) {
        return Err(field_error("invalid", "is invalid"));
    }
    if value.len() < MIN_NAME_LETTERS {
        return Err(field_error("too_short", "must have at least 2 letters"));
    }
    Ok(())
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(blank());
    }
    if !USERNAME_REGEX.is_match(value) {
        return Err(field_error("invalid", "is invalid"));
    }
    if value.len() < MIN_USERNAME_LEN {
        return Err(field_error("too_short", "must be at least 6 characters"));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(blank());
    }
    if value.len() > 254 || !EMAIL_REGEX.is_match(value) {
        return Err(field_error("invalid", "is invalid"));
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(blank());
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(field_error("too_short", "must be at least 6 characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), ValidationError>) -> String {
        result
            .unwrap_err()
            .message
            .map(|m| m.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_first_name() {
        assert!(validate_first_name("Mary Ann").is_ok());
        assert_eq!(message(validate_first_name("")), "can't be blank");
        assert_eq!(message(validate_first_name("J0hn")), "is invalid");
        assert_eq!(message(validate_first_name("J ")), "must have at least 2 letters");
    }

    #[test]
    fn test_last_name() {
        assert!(validate_last_name("Hopper").is_ok());
        assert_eq!(message(validate_last_name("Van Dyke")), "is invalid");
        assert_eq!(message(validate_last_name("H")), "must have at least 2 letters");
    }

    #[test]
    fn test_username() {
        assert!(validate_username("grace01").is_ok());
        assert_eq!(message(validate_username("grace_01")), "is invalid");
        assert_eq!(message(validate_username("grace")), "must be at least 6 characters");
    }

    #[test]
    fn test_email() {
        assert!(validate_email("grace@navy.mil").is_ok());
        assert_eq!(message(validate_email("grace@navy")), "is invalid");
        assert_eq!(message(validate_email("")), "can't be blank");
    }

    #[test]
    fn test_password() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(message(validate_password("12345")), "must be at least 6 characters");
    }
}
