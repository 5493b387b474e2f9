//! Wire types for the authorization code flow.

use grove_identity_core::Identity;
use serde::{Deserialize, Serialize};

/// Query parameters the authorization server appends to the redirect URI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Successful response from the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub scope: Option<String>,
    pub refresh_token: Option<String>,
    /// Present when the `openid` scope was granted.
    pub id_token: Option<String>,
}

/// Error body from the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenErrorBody {
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Terminal result of one callback invocation.
#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    Authenticated {
        tokens: TokenResponse,
        identity: Identity,
    },
    /// The attempt was already consumed by an earlier invocation; nothing
    /// was sent to the network.
    AlreadyHandled,
}
