//! One-time passcode generation for the password-reset flow.
//!
//! Codes are short-lived and compared server-side against the stored reset
//! session, so a uniformly random 6-digit decimal string is sufficient.

use rand::Rng;

/// Number of decimal digits in a generated passcode.
pub const OTP_LENGTH: usize = 6;

/// Smallest value a passcode can take (no leading zero).
const OTP_MIN: u32 = 100_000;

/// Largest value a passcode can take.
const OTP_MAX: u32 = 999_999;

/// Generate a random 6-digit one-time passcode.
///
/// The value is drawn uniformly from `100000..=999999`, so the string is
/// always exactly [`OTP_LENGTH`] digits with a non-zero leading digit.
pub fn generate_otp() -> String {
    rand::rng().random_range(OTP_MIN..=OTP_MAX).to_string()
}
