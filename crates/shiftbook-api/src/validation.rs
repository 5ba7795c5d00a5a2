//! Request validation.
//!
//! Stored documents are never re-validated on read; everything here runs
//! at the HTTP boundary before a core call.

use chrono::{DateTime, Utc};

use shiftbook_db::instant::parse_instant;

use crate::error::{ApiError, ApiResult};

pub const MAX_EMPLOYER_NAME_LEN: usize = 80;
pub const MAX_NOTE_LEN: usize = 200;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} must not be empty")));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(ApiError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        )));
    }
    Ok(())
}

pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> ApiResult<()> {
    if let Some(v) = value {
        let len = v.chars().count();
        if len > max_len {
            return Err(ApiError::validation(format!(
                "{field} is too long ({len} chars, max {max_len})"
            )));
        }
    }
    Ok(())
}

/// Strictly positive, finite, at most two decimal places.
pub fn validate_hourly_rate(rate: f64) -> ApiResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ApiError::validation("hourlyRate must be a positive number"));
    }
    let cents = rate * 100.0;
    if (cents - cents.round()).abs() > 1e-6 {
        return Err(ApiError::validation("hourlyRate must have at most 2 decimal places"));
    }
    Ok(())
}

pub fn validate_tips(tips: Option<f64>) -> ApiResult<()> {
    match tips {
        Some(t) if !t.is_finite() || t < 0.0 => {
            Err(ApiError::validation("tips must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

pub fn validate_amount(amount: f64) -> ApiResult<()> {
    if !amount.is_finite() {
        return Err(ApiError::validation("amount must be a finite number"));
    }
    Ok(())
}

pub fn validate_reference(value: &Option<String>, field: &str) -> ApiResult<()> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(ApiError::validation(format!("{field} must not be empty")))
        }
        _ => Ok(()),
    }
}

pub fn parse_time(value: &str, field: &str) -> ApiResult<DateTime<Utc>> {
    parse_instant(value)
        .ok_or_else(|| ApiError::validation(format!("{field} is not a valid date/time: {value:?}")))
}

pub fn parse_optional_time(value: Option<&str>, field: &str) -> ApiResult<Option<DateTime<Utc>>> {
    value.map(|v| parse_time(v, field)).transpose()
}

pub fn validate_credentials(username: &str, password: &str) -> ApiResult<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ApiError::validation(format!(
            "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
        )));
    }
    if username.trim() != username {
        return Err(ApiError::validation("username must not start or end with whitespace"));
    }
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(ApiError::validation(format!(
            "password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
