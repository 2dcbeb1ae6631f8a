use crate::error::ExternalServiceError;

/// Convert reqwest errors to ExternalServiceError with endpoint context
pub fn convert_request_error(
    error: reqwest::Error,
    endpoint: &str,
    timeout_secs: u64,
) -> ExternalServiceError {
    if error.is_timeout() {
        return ExternalServiceError::Timeout {
            timeout_secs,
            endpoint: endpoint.to_string(),
        };
    }

    ExternalServiceError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert JSON deserialization errors with endpoint context
pub fn convert_json_error(error: reqwest::Error, endpoint: &str) -> ExternalServiceError {
    ExternalServiceError::MalformedPayload {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}
