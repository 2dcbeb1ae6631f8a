//! One-line status messages for completed operations

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationStatus {
    Success,
    Warning,
    Error,
    Info,
}

impl OperationStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            OperationStatus::Success => "✅",
            OperationStatus::Warning => "⚠️",
            OperationStatus::Error => "❌",
            OperationStatus::Info => "💡",
        }
    }
}

pub fn format_status(message: &str, status: OperationStatus) -> String {
    format!("{} {}", status.emoji(), message)
}

/// Display operation status with appropriate emoji
pub fn display_status(message: &str, status: OperationStatus) {
    println!("{}", format_status(message, status));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status() {
        assert_eq!(
            format_status("Storage added", OperationStatus::Success),
            "✅ Storage added"
        );
        assert_eq!(
            format_status("Restart the application", OperationStatus::Info),
            "💡 Restart the application"
        );
    }
}
