//! Session source for the inbox: HTTP client for the admin sessions API
//!
//! Provides a `SessionSource` trait with an implementation for:
//! - **HTTP**: `GET {base}/admin/sessions` with bearer authentication
//!
//! No retries are performed. A 401 surfaces as `FetchError::AuthExpired`
//! so the caller can sign out; everything else is a recoverable failure.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::{Session, SessionEnvelope, ShapeError};
use crate::query::SessionQuery;

// ============================================================================
// SessionSource trait
// ============================================================================

/// Abstraction over where inbox sessions come from.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetch the raw (unclassified) session list matching `query`.
    async fn fetch_sessions(
        &self,
        query: &SessionQuery,
        token: &str,
    ) -> Result<Vec<Session>, FetchError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

/// Session fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication expired or invalid")]
    AuthExpired,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid session data: {0}")]
    InvalidSession(#[from] ShapeError),
}

impl FetchError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, FetchError::AuthExpired)
    }
}

// ============================================================================
// HttpSessionClient
// ============================================================================

/// Reads sessions from the admin API.
#[derive(Debug, Clone)]
pub struct HttpSessionClient {
    client: Client,
    base_url: String,
}

impl HttpSessionClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        Self::with_base_url(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// Create a client with a custom base URL (for testing / integration)
    pub fn with_base_url(base_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn sessions_url(&self) -> String {
        format!("{}/admin/sessions", self.base_url)
    }
}

#[async_trait]
impl SessionSource for HttpSessionClient {
    async fn fetch_sessions(
        &self,
        query: &SessionQuery,
        token: &str,
    ) -> Result<Vec<Session>, FetchError> {
        let response = self
            .client
            .get(self.sessions_url())
            .query(&query.to_pairs())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::AuthExpired);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let envelope: SessionEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.into_sessions()?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionStatus, Tab};
    use crate::query::build_query;
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> HttpSessionClient {
        HttpSessionClient::with_base_url(server.uri(), Duration::from_secs(5))
            .expect("Failed to create client")
    }

    fn sessions_body() -> serde_json::Value {
        serde_json::json!({
            "items": [
                { "sessionId": "s-1", "status": "active", "assignedAgent": "u1" },
                { "sessionId": "s-2", "status": "closed", "assignedAgent": "u1" }
            ]
        })
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_bearer_token() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .and(path("/admin/sessions"))
            .and(query_param("agentId", "u1"))
            .and(query_param("status", "closed"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sessions_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Resolved, Some("u1")).unwrap();
        let sessions = client.fetch_sessions(&query, "tok-123").await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[1].status, SessionStatus::Closed);
    }

    #[tokio::test]
    async fn test_unassigned_query_omits_agent_id() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .and(path("/admin/sessions"))
            .and(query_param("status", "active"))
            .and(query_param_is_missing("agentId"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sessions": [] })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Unassigned, Some("u1")).unwrap();
        let sessions = client.fetch_sessions(&query, "tok").await.unwrap();
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn test_401_is_auth_expired() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Active, Some("u1")).unwrap();
        let err = client.fetch_sessions(&query, "expired").await.unwrap_err();
        assert!(err.is_auth_expired(), "Expected AuthExpired, got {:?}", err);
    }

    #[tokio::test]
    async fn test_500_is_api_error() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Active, Some("u1")).unwrap();
        match client.fetch_sessions(&query, "tok").await {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Active, Some("u1")).unwrap();
        let err = client.fetch_sessions(&query, "tok").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_invalid_session() {
        let mock_server = MockServer::start().await;
        let client = test_client(&mock_server);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{ "sessionId": "", "status": "active" }]
            })))
            .mount(&mock_server)
            .await;

        let query = build_query(Tab::Active, Some("u1")).unwrap();
        let err = client.fetch_sessions(&query, "tok").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidSession(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Port 9 (discard) is not listening in test environments.
        let client =
            HttpSessionClient::with_base_url("http://127.0.0.1:9".to_string(), Duration::from_secs(2))
                .unwrap();
        let query = build_query(Tab::Active, Some("u1")).unwrap();
        let err = client.fetch_sessions(&query, "tok").await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_)), "got {:?}", err);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpSessionClient::with_base_url(
            "https://admin.example.com/api/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.sessions_url(), "https://admin.example.com/api/admin/sessions");
        assert_eq!(client.name(), "http");
    }
}
