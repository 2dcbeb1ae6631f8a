use crate::api::error_helpers::{convert_json_error, convert_request_error};
use crate::api::models::{ApiEnvelope, LoginData, LoginRequest, ProbeResult};
use crate::error::{AppError, ExternalServiceError};
use crate::utils::validation::{require_non_empty, validate_url};
use reqwest::{Client, Method, RequestBuilder};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("mountctl/", env!("CARGO_PKG_VERSION"));
const LOGIN_ENDPOINT: &str = "/api/auth/login";

/// Admin endpoints that require a valid token, used to diagnose rejections
pub const PROBE_ENDPOINTS: &[&str] = &[
    "/api/me",
    "/api/admin/storage/list",
    "/api/admin/driver/list",
];

/// Client for the application's own admin API
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
}

impl AdminClient {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, AppError> {
        validate_url(&base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(AdminClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn build_request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);

        if let Some(token) = token {
            request = request.header("Authorization", token);
        }

        request
    }

    /// Exchange credentials for a token
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        require_non_empty("username", username)?;
        require_non_empty("password", password)?;

        log::debug!("logging in to {} as {}", self.base_url, username);

        let response = self
            .build_request(Method::POST, LOGIN_ENDPOINT, None)
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(|e| convert_request_error(e, LOGIN_ENDPOINT, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExternalServiceError::Http {
                status: status.as_u16(),
                endpoint: LOGIN_ENDPOINT.to_string(),
                message,
            }
            .into());
        }

        let envelope: ApiEnvelope<LoginData> = response
            .json()
            .await
            .map_err(|e| convert_json_error(e, LOGIN_ENDPOINT))?;

        if envelope.code != 200 {
            return Err(ExternalServiceError::Application {
                code: envelope.code,
                endpoint: LOGIN_ENDPOINT.to_string(),
                message: envelope.message,
            }
            .into());
        }

        envelope
            .data
            .map(|data| data.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ExternalServiceError::MalformedPayload {
                    endpoint: LOGIN_ENDPOINT.to_string(),
                    message: "response carried no token".to_string(),
                }
                .into()
            })
    }

    /// Call `endpoint` with `token` and report how the application answered.
    ///
    /// Only transport failures are errors; a rejected token is a normal
    /// result here.
    pub async fn probe(&self, token: &str, endpoint: &str) -> Result<ProbeResult, AppError> {
        let response = self
            .build_request(Method::GET, endpoint, Some(token))
            .send()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))?;

        let http_status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let (code, message) = match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body) {
            Ok(envelope) => (Some(envelope.code), Some(envelope.message)),
            Err(_) => (None, None),
        };

        log::debug!("probe {} -> {} {:?}", endpoint, http_status, code);

        Ok(ProbeResult {
            endpoint: endpoint.to_string(),
            http_status,
            code,
            message,
        })
    }

    pub async fn probe_all(&self, token: &str) -> Result<Vec<ProbeResult>, AppError> {
        let mut results = Vec::with_capacity(PROBE_ENDPOINTS.len());
        for endpoint in PROBE_ENDPOINTS {
            results.push(self.probe(token, endpoint).await?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(AdminClient::new("localhost:5244".to_string()).is_err());
        let client = AdminClient::new("http://localhost:5244/".to_string()).expect("client");
        assert_eq!(client.base_url, "http://localhost:5244");
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "admin", "password": "secret"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "message": "success",
                "data": {"token": "header.payload.signature"}
            })))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");
        let token = client.login("admin", "secret").await.expect("login");
        assert_eq!(token, "header.payload.signature");
    }

    #[tokio::test]
    async fn test_login_rejected_by_application() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 400,
                "message": "password is incorrect",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");
        match client.login("admin", "wrong").await {
            Err(AppError::ExternalService(ExternalServiceError::Application { code, message, .. })) => {
                assert_eq!(code, 400);
                assert_eq!(message, "password is incorrect");
            }
            other => panic!("expected application error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_http_error_and_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");
        assert!(matches!(
            client.login("admin", "secret").await,
            Err(AppError::ExternalService(ExternalServiceError::Http { status: 502, .. }))
        ));

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");
        assert!(matches!(
            client.login("admin", "secret").await,
            Err(AppError::ExternalService(ExternalServiceError::MalformedPayload { .. }))
        ));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let client = AdminClient::new("http://localhost:5244".to_string()).expect("client");
        assert!(matches!(
            client.login("", "secret").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_reports_codes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/admin/storage/list"))
            .and(header("Authorization", "good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "message": "success",
                "data": {"content": [], "total": 0}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/admin/storage/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 401,
                "message": "token is invalidated",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");

        let ok = client
            .probe("good-token", "/api/admin/storage/list")
            .await
            .expect("probe");
        assert!(ok.is_authorized());

        let rejected = client
            .probe("stale-token", "/api/admin/storage/list")
            .await
            .expect("probe");
        assert!(!rejected.is_authorized());
        assert_eq!(rejected.code, Some(401));
        assert_eq!(rejected.message.as_deref(), Some("token is invalidated"));
    }

    #[tokio::test]
    async fn test_probe_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/me"))
            .respond_with(ResponseTemplate::new(404).set_body_string("404 page not found"))
            .mount(&server)
            .await;

        let client = AdminClient::new(server.uri()).expect("client");
        let result = client.probe("t", "/api/me").await.expect("probe");
        assert_eq!(result.http_status, 404);
        assert_eq!(result.code, None);
        assert!(!result.is_authorized());
    }
}
