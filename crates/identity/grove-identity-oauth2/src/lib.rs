//! Client half of the OAuth2 authorization code flow with PKCE (RFC 7636)
//! and CSRF state guarding.
//!
//! The flow is driven by [`FlowClient`]: `begin_authorization` creates the
//! redirect URL and persists an attempt record (verifier + state) in an
//! [`AttemptStore`], and `handle_callback` runs the return leg - state
//! verification, code-for-token exchange, and identity resolution -
//! consuming the attempt exactly once.

mod authorize;
mod client;
mod config;
mod error;
mod pkce;
mod state;
mod types;


pub use authorize::build_authorization_url;
pub use client::FlowClient;
pub use config::FlowConfig;
pub use error::{FlowError, FlowResult};
pub use pkce::PkceChallenge;
pub use state::{Attempt, AttemptStore, InMemoryAttemptStore, issue_state, verify_state};
pub use types::{CallbackOutcome, CallbackParams, TokenResponse};
