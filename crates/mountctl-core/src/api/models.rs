use serde::{Deserialize, Serialize};

/// Response envelope used by every admin endpoint: `{code, message, data}`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiEnvelope<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Outcome of calling one endpoint with a token
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub endpoint: String,
    pub http_status: u16,
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl ProbeResult {
    /// The application accepted the token
    pub fn is_authorized(&self) -> bool {
        self.http_status == 200 && self.code == Some(200)
    }
}
