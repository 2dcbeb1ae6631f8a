//! Input processing and environment utilities
//!
//! Credential material must never be embedded in scripts or shell history,
//! so every secret-bearing argument can also come from a file or stdin.

use crate::error::{ConfigError, ValidationError};
use std::io::Read;
use std::path::Path;

/// Environment variable holding the database path
pub const ENV_DB: &str = "MOUNTCTL_DB";
/// Environment variable holding the storage table name
pub const ENV_TABLE: &str = "MOUNTCTL_TABLE";
/// Environment variable holding the application's base URL
pub const ENV_URL: &str = "MOUNTCTL_URL";

/// Environment variable configuration reader
pub struct EnvConfigReader;

impl EnvConfigReader {
    fn read(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    pub fn read_db_path() -> Option<String> {
        Self::read(ENV_DB)
    }

    pub fn read_table() -> Option<String> {
        Self::read(ENV_TABLE)
    }

    pub fn read_url() -> Option<String> {
        Self::read(ENV_URL)
    }

    /// Read NO_COLOR environment variable
    pub fn read_no_color() -> bool {
        std::env::var("NO_COLOR").is_ok()
    }
}

/// Resolve a value given inline or through a file (`-` means stdin).
///
/// Surrounding whitespace, including the trailing newline most editors add,
/// is removed. An empty result is a validation error.
pub fn read_value(
    field: &str,
    inline: Option<String>,
    file: Option<&Path>,
) -> crate::Result<String> {
    let raw = match (inline, file) {
        (Some(value), None) => value,
        (None, Some(path)) if path == Path::new("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| ConfigError::FileIo {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            buffer
        }
        (None, Some(path)) => {
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileIo {
                path: path.display().to_string(),
                source,
            })?
        }
        (Some(_), Some(_)) => {
            return Err(ValidationError::InvalidArguments(format!(
                "{} was given both inline and as a file",
                field
            ))
            .into());
        }
        (None, None) => return Err(ValidationError::empty(field).into()),
    };

    let value = raw.trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::empty(field).into());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_read_value_inline() {
        let value = read_value("cookie", Some("  a=1; b=2 \n".to_string()), None).unwrap();
        assert_eq!(value, "a=1; b=2");
    }

    #[test]
    fn test_read_value_from_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("refresh_token.txt");
        std::fs::write(&path, "122.abcdef\n").expect("Failed to write token file");

        let value = read_value("refresh_token", None, Some(&path)).unwrap();
        assert_eq!(value, "122.abcdef");
    }

    #[test]
    fn test_read_value_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = read_value("refresh_token", None, Some(&temp_dir.path().join("nope")));
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::FileIo { .. }))
        ));
    }

    #[test]
    fn test_read_value_rejects_empty_and_conflicting() {
        assert!(matches!(
            read_value("cookie", Some("   ".to_string()), None),
            Err(AppError::Validation(ValidationError::EmptyField { .. }))
        ));
        assert!(matches!(
            read_value("cookie", None, None),
            Err(AppError::Validation(ValidationError::EmptyField { .. }))
        ));
        assert!(matches!(
            read_value("cookie", Some("a=1".to_string()), Some(Path::new("x"))),
            Err(AppError::Validation(ValidationError::InvalidArguments(_)))
        ));
    }

    #[test]
    fn test_read_table_ignores_blank() {
        let original = std::env::var(ENV_TABLE).ok();

        unsafe {
            std::env::set_var(ENV_TABLE, "  ");
        }
        assert_eq!(EnvConfigReader::read_table(), None);

        unsafe {
            std::env::set_var(ENV_TABLE, "storages");
        }
        assert_eq!(EnvConfigReader::read_table(), Some("storages".to_string()));

        unsafe {
            match original {
                Some(value) => std::env::set_var(ENV_TABLE, value),
                None => std::env::remove_var(ENV_TABLE),
            }
        }
    }
}
