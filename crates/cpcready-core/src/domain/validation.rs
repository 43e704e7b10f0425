//! Semantic validation of a [`ConfigurationDocument`].
//!
//! The store guarantees only that what is written is what is read back.
//! Whether the values make sense (a well-formed M4Board address, a user
//! number the CPC accepts) is checked here, by the caller, before saving.

use thiserror::Error;

use super::document::ConfigurationDocument;
use super::field::ConfigField;

/// Highest AMSDOS user number.
pub const MAX_USER: i64 = 15;

/// Highest CPC screen mode.
pub const MAX_MODE: i64 = 2;

/// A field value that violates its semantic constraint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The M4Board address is not empty and not a dotted quad.
    #[error("M4Board IP address \"{0}\" is invalid; use the format xxx.xxx.xxx.xxx")]
    InvalidIp(String),

    #[error("user number {0} is out of range (0-15)")]
    UserOutOfRange(i64),

    #[error("video mode {0} is invalid (expected 0, 1 or 2)")]
    InvalidMode(i64),

    /// Text entered for a field could not be converted to the field's type.
    #[error("invalid value \"{value}\" for {field}")]
    InvalidValue { field: ConfigField, value: String },
}

/// Returns `true` if `ip` is empty or a dotted quad with every octet in 0-255.
///
/// Each octet must be a non-empty run of ASCII digits; leading zeros are
/// accepted (`"010.0.0.1"`), signs and whitespace are not.
pub fn validate_ip(ip: &str) -> bool {
    if ip.is_empty() {
        return true;
    }
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|part| {
        !part.is_empty()
            && part.bytes().all(|b| b.is_ascii_digit())
            && part.parse::<u32>().is_ok_and(|n| n <= 255)
    })
}

pub fn validate_user(user: i64) -> Result<(), ValidationError> {
    if !(0..=MAX_USER).contains(&user) {
        return Err(ValidationError::UserOutOfRange(user));
    }
    Ok(())
}

pub fn validate_mode(mode: i64) -> Result<(), ValidationError> {
    if !(0..=MAX_MODE).contains(&mode) {
        return Err(ValidationError::InvalidMode(mode));
    }
    Ok(())
}

impl ConfigurationDocument {
    /// Checks every constrained field, reporting the first violation.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first field, in document order,
    /// whose value is outside its allowed range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !validate_ip(&self.emulator.m4board_ip) {
            return Err(ValidationError::InvalidIp(self.emulator.m4board_ip.clone()));
        }
        validate_user(self.system.user)?;
        validate_mode(self.system.mode)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
