pub mod retry;

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

pub const PHONE_LENGTH: usize = 10;
pub const OTP_LENGTH: usize = 6;

/// Validates a local (un-prefixed) mobile number. The error is the exact
/// message shown next to the phone input.
pub fn validate_phone(number: &str) -> Result<(), &'static str> {
    if number.is_empty() {
        return Err("Phone number is required");
    }
    if !DIGITS_ONLY_REGEX.is_match(number) {
        return Err("Phone number should contain only digits");
    }
    if number.len() != PHONE_LENGTH {
        return Err("Phone number should be 10 digits");
    }
    Ok(())
}

pub fn validate_otp(code: &str) -> Result<(), &'static str> {
    if code.len() != OTP_LENGTH || !DIGITS_ONLY_REGEX.is_match(code) {
        return Err("OTP should be 6 digits");
    }
    Ok(())
}
