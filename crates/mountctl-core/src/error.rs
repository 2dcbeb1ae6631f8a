use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("PersistenceError: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("ValidationError: {0}")]
    Validation(#[from] ValidationError),
    #[error("ExternalServiceError: {0}")]
    ExternalService(#[from] ExternalServiceError),
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("No storage found for {selector}")]
    NotFound { selector: String },
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Database file not found: {path}")]
    DatabaseNotFound { path: String },
    #[error("Table '{table}' does not exist in {path}")]
    TableNotFound { table: String, path: String },
    #[error("Invalid table name '{0}'")]
    InvalidTableName(String),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to serialize addition: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: String },
    #[error("Invalid JSON for {field}: {reason}")]
    InvalidJson { field: String, reason: String },
    #[error("Invalid token: {reason}")]
    InvalidToken { reason: String },
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[derive(Error, Debug)]
pub enum ExternalServiceError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Request to {endpoint} rejected with code {code}: {message}")]
    Application {
        code: i64,
        endpoint: String,
        message: String,
    },
    #[error("Malformed response from {endpoint}: {message}")]
    MalformedPayload { endpoint: String, message: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    Parse { message: String },
    #[error("Database path is not configured")]
    MissingDatabasePath,
}

impl ValidationError {
    pub fn empty(field: &str) -> Self {
        ValidationError::EmptyField {
            field: field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Persistence(persistence_error) => match persistence_error {
                PersistenceError::DatabaseNotFound { .. }
                | PersistenceError::TableNotFound { .. } => ErrorSeverity::High,
                PersistenceError::Sqlite(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            AppError::Validation(_) => ErrorSeverity::Medium,
            AppError::ExternalService(service_error) => match service_error {
                ExternalServiceError::Http { status, .. } if *status == 401 => ErrorSeverity::High,
                ExternalServiceError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::NotFound { .. } => ErrorSeverity::Low,
        }
    }

    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Persistence(PersistenceError::DatabaseNotFound { path }) => {
                format!("Database not found at {}", path)
            }
            AppError::Persistence(PersistenceError::TableNotFound { table, .. }) => {
                format!("Storage table '{}' has not been created yet", table)
            }
            AppError::Config(ConfigError::MissingDatabasePath) => {
                "No database path configured".to_string()
            }
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Persistence(
                PersistenceError::DatabaseNotFound { .. } | PersistenceError::TableNotFound { .. },
            ) => Some(
                "Start the target application first to create the database, then retry"
                    .to_string(),
            ),
            AppError::Persistence(PersistenceError::Sqlite(_)) => Some(
                "The database may be locked by the running application; stop it and retry"
                    .to_string(),
            ),
            AppError::Config(ConfigError::MissingDatabasePath) => Some(
                "Pass --db <path>, set MOUNTCTL_DB, or run 'mountctl config set --db <path>'"
                    .to_string(),
            ),
            AppError::ExternalService(ExternalServiceError::Timeout { .. }) => {
                Some("Check that the application is running and reachable".to_string())
            }
            AppError::ExternalService(ExternalServiceError::Http { status: 401, .. }) => {
                Some("The token was rejected; log in again with 'mountctl token check'".to_string())
            }
            AppError::NotFound { .. } => {
                Some("'mountctl storage list' shows the configured storages".to_string())
            }
            _ => None,
        }
    }
}
