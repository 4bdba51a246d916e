//! Input validation utilities
//!
//! Each field has an ordered list of checks. The first failing check of a
//! field produces that field's message; failures of different fields are
//! collected into a single [`ValidationError`].

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{CreateUserRequest, UpdateUserRequest};

pub const EMAIL_MESSAGE: &str =
    "The input must be exactly 4 to 10 characters long and include at least 2 numbers.";
pub const PHONE_MESSAGE: &str = "Please provide a valid mobile number.";
pub const PASSWORD_MESSAGE: &str = "Password must be between 6 and 64 characters long with 1 special character and capital character each";
pub const EMPTY_UPDATE_MESSAGE: &str = "At least one of email, phone or password must be provided";

const PASSWORD_SPECIALS: &str = "@#$%^&+=";

/// One or more fields failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .0.join("; "))]
pub struct ValidationError(pub Vec<String>);

fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} should not be empty", field));
    }
    Ok(())
}

/// Validate email: 4 to 10 ASCII letters or digits, at least 2 of them digits
pub fn validate_email(email: &str) -> Result<(), String> {
    require_non_empty("email", email)?;

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9]{4,10}$").expect("Failed to compile email regex"));

    let digits = email.chars().filter(char::is_ascii_digit).count();
    if !regex.is_match(email) || digits < 2 {
        return Err(EMAIL_MESSAGE.to_string());
    }

    Ok(())
}

/// Validate phone: optional `+`, 1-4 digit country code, optional single
/// separator, 1-14 digit number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    require_non_empty("phone", phone)?;

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9]{1,4}[ .\-]?[0-9]{1,14}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err(PHONE_MESSAGE.to_string());
    }

    Ok(())
}

/// Validate password complexity
///
/// Length is counted in UTF-16 code units, matching how browser clients
/// measure the same rule.
pub fn validate_password(password: &str) -> Result<(), String> {
    require_non_empty("password", password)?;

    let length = password.encode_utf16().count();
    if !(6..=64).contains(&length) {
        return Err(PASSWORD_MESSAGE.to_string());
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            return Err(PASSWORD_MESSAGE.to_string());
        }

        if c.is_ascii_uppercase() {
            has_upper = true;
        } else if c.is_ascii_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SPECIALS.contains(c) {
            has_special = true;
        }
    }

    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(PASSWORD_MESSAGE.to_string());
    }

    Ok(())
}

/// Validate a create payload; every field is mandatory
pub fn validate_create(payload: &CreateUserRequest) -> Result<(), ValidationError> {
    let errors: Vec<String> = [
        validate_email(&payload.email),
        validate_phone(&payload.phone),
        validate_password(&payload.password),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}

/// Validate an update payload; only supplied fields are checked
pub fn validate_update(payload: &UpdateUserRequest) -> Result<(), ValidationError> {
    if payload.is_empty() {
        return Err(ValidationError(vec![EMPTY_UPDATE_MESSAGE.to_string()]));
    }

    let errors: Vec<String> = [
        payload.email.as_deref().map(validate_email),
        payload.phone.as_deref().map(validate_phone),
        payload.password.as_deref().map(validate_password),
    ]
    .into_iter()
    .flatten()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError(errors))
    }
}
