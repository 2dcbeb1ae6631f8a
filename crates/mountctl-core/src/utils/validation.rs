//! Input validation and normalization utilities
//!
//! Checks applied to operator-supplied values before they reach the
//! database or the admin API.

use crate::error::{PersistenceError, ValidationError};

/// Reject empty or whitespace-only values
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty(field));
    }
    Ok(())
}

/// Normalize a mount path so that it always starts with `/`
///
/// # Examples
/// ```
/// use mountctl_core::utils::validation::normalize_mount_path;
/// assert_eq!(normalize_mount_path("baidu").unwrap(), "/baidu");
/// assert_eq!(normalize_mount_path(" /quark ").unwrap(), "/quark");
/// ```
pub fn normalize_mount_path(mount_path: &str) -> Result<String, ValidationError> {
    let trimmed = mount_path.trim();
    require_non_empty("mount_path", trimmed)?;

    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{}", trimmed))
    }
}

/// Table names are spliced into SQL, so only plain identifiers are allowed
pub fn validate_table_name(table: &str) -> Result<(), PersistenceError> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidTableName(table.to_string()))
    }
}

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    require_non_empty("URL", url)?;

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        )));
    }

    Ok(())
}

/// Parse a JSON object supplied on the command line or in a file
pub fn parse_json_object(
    field: &str,
    text: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, ValidationError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(ValidationError::InvalidJson {
            field: field.to_string(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(ValidationError::InvalidJson {
            field: field.to_string(),
            reason: e.to_string(),
        }),
    }
}
