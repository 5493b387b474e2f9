//! Login bridging and consent negotiation.
//!
//! When an authorization request arrives without a first-party session,
//! a [`LoginBridge`] exchanges the user's external identity assertion for
//! a session cookie (at most once per instance), then forwards into the
//! consent step with the original authorization parameters untouched. The
//! [`ConsentNegotiator`] loads what the consent screen shows and submits
//! the approve/deny decision, handing back the server's redirect target
//! verbatim.

mod bridge;
mod error;
mod negotiator;
mod types;


pub use bridge::{BridgeOutcome, BridgedSession, LoginBridge};
pub use error::{ConsentError, ConsentResult};
pub use negotiator::ConsentNegotiator;
pub use types::{ConsentConfig, ConsentContext, ConsentParams, RedirectTo};
