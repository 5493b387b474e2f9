//! Consent surface error types.

use thiserror::Error;

pub type ConsentResult<T> = Result<T, ConsentError>;

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("Session exchange failed: {0}")]
    SessionExchangeFailed(String),

    #[error("App info fetch failed: {0}")]
    AppInfoFetchFailed(String),

    #[error("Consent submission failed: {0}")]
    ConsentSubmitFailed(String),

    #[error("No authenticated session")]
    NotAuthenticated,

    #[error("Invalid redirect response: {0}")]
    InvalidRedirectResponse(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}
