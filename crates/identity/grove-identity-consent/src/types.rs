//! Consent protocol types.

use grove_identity_core::{AppInfo, SessionUser};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for the consent surface of one authorization server.
#[derive(Debug, Clone)]
pub struct ConsentConfig {
    /// Base URL of the authorization server API.
    pub api_base: String,
    /// External identity provider name; names the login endpoint
    /// (`/auth/login/{provider}`) and the token field in its body.
    pub provider: String,
    pub http_timeout_seconds: u64,
}

impl ConsentConfig {
    pub fn new(api_base: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            provider: provider.into(),
            http_timeout_seconds: 30,
        }
    }

    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.http_timeout_seconds = seconds;
        self
    }
}

/// The original authorization parameters, carried through login and
/// consent untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentParams {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub state: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
}

/// Everything the consent screen needs: the requesting app's metadata,
/// and the current session user when one exists.
#[derive(Debug, Clone)]
pub struct ConsentContext {
    pub app: AppInfo,
    /// `None` when the session read failed; rendering proceeds without
    /// it, but approval is blocked until identity is known.
    pub user: Option<SessionUser>,
}

/// The URL the consent endpoint tells us to navigate to.
///
/// Deliberately an opaque string, never parsed into a `Url`: it encodes
/// either `code`+`state` or an OAuth error response for the requesting
/// application, and must be followed verbatim, exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTo(pub(crate) String);

impl RedirectTo {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RedirectTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConsentDecisionResponse {
    pub redirect_to: String,
}

/// Error body the authorization server uses across its endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    /// Best human-readable description out of an error response body.
    pub fn describe(body: &str, status: reqwest::StatusCode) -> String {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error_description.or(b.error))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.to_string()
                }
            })
    }
}
