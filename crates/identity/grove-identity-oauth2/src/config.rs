//! Flow configuration.

use serde::{Deserialize, Serialize};

/// Configuration for one registered client application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    pub client_id: String,
    /// Present for confidential clients only; public clients rely on
    /// PKCE alone.
    pub client_secret: Option<String>,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub userinfo_endpoint: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Lifetime of stored attempt records.
    pub attempt_ttl_seconds: u64,
    pub http_timeout_seconds: u64,
}

impl FlowConfig {
    pub fn new(client_id: impl Into<String>, server_base: &str, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            authorization_endpoint: format!("{server_base}/oauth/authorize"),
            token_endpoint: format!("{server_base}/oauth/token"),
            userinfo_endpoint: format!("{server_base}/oauth/userinfo"),
            redirect_uri: redirect_uri.into(),
            scopes: vec!["openid".to_string()],
            attempt_ttl_seconds: 600,
            http_timeout_seconds: 30,
        }
    }

    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn with_attempt_ttl(mut self, seconds: u64) -> Self {
        self.attempt_ttl_seconds = seconds;
        self
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }
}
