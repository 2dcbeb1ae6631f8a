//! Display masking for credential material
//!
//! Only ever applied to copies that are about to be shown. Writes always go
//! through the unmasked mapping.

use crate::store::{Addition, StorageRecord};
use crate::utils::text::{head_chars, tail_chars};
use serde_json::Value;

/// Replacement shown instead of a sensitive value
pub const REDACTED: &str = "***hidden***";

/// `addition` keys whose values are never displayed
pub const SENSITIVE_KEYS: &[&str] = &[
    "refresh_token",
    "access_token",
    "password",
    "cookie",
    "secret_access_key",
    "client_secret",
    "token",
];

pub fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYS.contains(&key)
}

/// Copy of the record's `addition` with sensitive values redacted.
///
/// Every key stays present so an operator can see which fields are set.
pub fn mask_sensitive(record: &StorageRecord) -> Addition {
    mask_addition(&record.addition)
}

pub fn mask_addition(addition: &Addition) -> Addition {
    addition
        .iter()
        .map(|(key, value)| {
            if is_sensitive(key) {
                (key.clone(), Value::String(REDACTED.to_string()))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

/// Short preview of a secret: first 8 and last 4 characters.
///
/// # Examples
/// ```
/// use mountctl_core::core::mask::preview_secret;
/// assert_eq!(preview_secret("122.0123456789abcdef"), "122.0123****cdef");
/// assert_eq!(preview_secret("short"), "****");
/// ```
pub fn preview_secret(value: &str) -> String {
    if value.chars().count() > 12 {
        format!("{}****{}", head_chars(value, 8), tail_chars(value, 4))
    } else {
        "****".to_string()
    }
}
