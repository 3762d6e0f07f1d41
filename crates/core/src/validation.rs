//! Request field validation helpers shared by the API handlers.

use std::sync::LazyLock;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Regex matching a plausible email address (`local@domain.tld`).
static EMAIL_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Validate the shape of an email address.
pub fn validate_email(email: &str) -> Result<(), String> {
    if !EMAIL_RE.is_match(email) {
        return Err("email is invalid".to_string());
    }
    Ok(())
}

/// Validate password strength (minimum length only).
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} letters"
        ));
    }
    Ok(())
}
