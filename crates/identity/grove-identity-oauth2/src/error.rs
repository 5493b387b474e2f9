//! Authorization flow error types.

use thiserror::Error;

pub type FlowResult<T> = Result<T, FlowError>;

/// Every failure is terminal for the current authorization attempt.
/// Callers restart the flow from `begin_authorization`, which always
/// generates a fresh verifier and state.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("No authorization code received")]
    NoCode,

    #[error("State mismatch - possible CSRF attack")]
    CsrfMismatch,

    #[error("Missing PKCE code verifier")]
    MissingVerifier,

    #[error("No attempt stored for this state")]
    AttemptNotFound,

    #[error("Attempt already consumed")]
    AttemptAlreadyConsumed,

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Identity fetch failed: {0}")]
    IdentityFetchFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Secure random source unavailable")]
    CryptoUnavailable,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("Invalid user info response: {0}")]
    InvalidUserInfoResponse(String),
}
