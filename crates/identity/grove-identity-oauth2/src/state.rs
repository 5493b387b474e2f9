//! CSRF state tokens and per-attempt ephemeral storage.
//!
//! Each authorization attempt owns one `Attempt` record keyed by its
//! state token, so overlapping attempts from the same origin can never
//! consume each other's verifier. Records follow a write-once,
//! consume-once, clear-once discipline: `consume` moves the verifier out
//! and leaves a tombstone, which turns a replayed callback into a no-op
//! instead of a second token exchange.

use crate::error::{FlowError, FlowResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Issue a fresh anti-CSRF state token (UUID v4, 122 bits of entropy).
pub fn issue_state() -> String {
    Uuid::new_v4().to_string()
}

/// Constant-time comparison of the state echoed by the authorization
/// server against the stored value. `false` when the stored value is
/// absent; never panics.
pub fn verify_state(received: &str, stored: Option<&str>) -> bool {
    match stored {
        Some(stored) => received.as_bytes().ct_eq(stored.as_bytes()).into(),
        None => false,
    }
}

/// Ephemeral record for one authorization attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub state: String,
    /// Taken out on `consume`; `None` afterwards.
    pub code_verifier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed: bool,
}

impl Attempt {
    pub fn new(state: String, code_verifier: String, ttl_seconds: u64) -> Self {
        let created_at = Utc::now();
        let expires_at = created_at + Duration::seconds(ttl_seconds as i64);

        Self {
            state,
            code_verifier: Some(code_verifier),
            created_at,
            expires_at,
            consumed: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Storage scope for attempt records, keyed by state token.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Persist a new attempt.
    async fn create(&self, attempt: Attempt) -> FlowResult<()>;

    /// Consume the attempt for `state`, moving its verifier out and
    /// leaving a consumed tombstone behind.
    ///
    /// Errors: `AttemptNotFound` for unknown or expired states,
    /// `AttemptAlreadyConsumed` on the second consume of the same
    /// attempt.
    async fn consume(&self, state: &str) -> FlowResult<Attempt>;

    /// Erase the attempt's secrets and mark it consumed. Idempotent;
    /// unknown states are not an error.
    async fn clear(&self, state: &str) -> FlowResult<()>;

    /// Drop expired records and tombstones, returning the count removed.
    async fn cleanup_expired(&self) -> FlowResult<usize>;
}

/// In-memory implementation of `AttemptStore`.
pub struct InMemoryAttemptStore {
    attempts: RwLock<HashMap<String, Attempt>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self {
            attempts: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAttemptStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn create(&self, attempt: Attempt) -> FlowResult<()> {
        let mut attempts = self.attempts.write().await;
        debug!(state = %attempt.state, "storing authorization attempt");
        attempts.insert(attempt.state.clone(), attempt);
        Ok(())
    }

    async fn consume(&self, state: &str) -> FlowResult<Attempt> {
        let mut attempts = self.attempts.write().await;

        let record = attempts.get_mut(state).ok_or(FlowError::AttemptNotFound)?;

        if record.consumed {
            return Err(FlowError::AttemptAlreadyConsumed);
        }
        if record.is_expired() {
            attempts.remove(state);
            return Err(FlowError::AttemptNotFound);
        }

        record.consumed = true;
        let verifier = record.code_verifier.take();

        debug!(%state, "consumed authorization attempt");

        Ok(Attempt {
            state: record.state.clone(),
            code_verifier: verifier,
            created_at: record.created_at,
            expires_at: record.expires_at,
            consumed: true,
        })
    }

    async fn clear(&self, state: &str) -> FlowResult<()> {
        let mut attempts = self.attempts.write().await;
        if let Some(record) = attempts.get_mut(state) {
            record.code_verifier = None;
            record.consumed = true;
        }
        Ok(())
    }

    async fn cleanup_expired(&self) -> FlowResult<usize> {
        let mut attempts = self.attempts.write().await;
        let before = attempts.len();
        attempts.retain(|_, a| !a.is_expired());
        Ok(before - attempts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_states_are_unique() {
        let s1 = issue_state();
        let s2 = issue_state();
        assert_ne!(s1, s2);
        assert_eq!(s1.len(), 36);
    }

    #[test]
    fn verify_state_matches_itself() {
        let s = issue_state();
        assert!(verify_state(&s, Some(s.as_str())));
    }

    #[test]
    fn verify_state_rejects_mismatch_and_absence() {
        let s = issue_state();
        assert!(!verify_state(&s, Some("other")));
        assert!(!verify_state(&s, None));
    }

    #[tokio::test]
    async fn consume_moves_verifier_out_once() {
        let store = InMemoryAttemptStore::new();
        let state = issue_state();
        store
            .create(Attempt::new(state.clone(), "verifier123".to_string(), 300))
            .await
            .unwrap();

        let attempt = store.consume(&state).await.unwrap();
        assert_eq!(attempt.code_verifier.as_deref(), Some("verifier123"));

        // Second consume hits the tombstone, not a fresh attempt.
        let result = store.consume(&state).await;
        assert!(matches!(result, Err(FlowError::AttemptAlreadyConsumed)));
    }

    #[tokio::test]
    async fn consume_unknown_state_is_not_found() {
        let store = InMemoryAttemptStore::new();
        let result = store.consume("nope").await;
        assert!(matches!(result, Err(FlowError::AttemptNotFound)));
    }

    #[tokio::test]
    async fn expired_attempt_is_not_found() {
        let store = InMemoryAttemptStore::new();
        let state = issue_state();
        let mut attempt = Attempt::new(state.clone(), "v".to_string(), 300);
        attempt.expires_at = Utc::now() - Duration::minutes(1);
        store.create(attempt).await.unwrap();

        let result = store.consume(&state).await;
        assert!(matches!(result, Err(FlowError::AttemptNotFound)));
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = InMemoryAttemptStore::new();
        let state = issue_state();
        store
            .create(Attempt::new(state.clone(), "v".to_string(), 300))
            .await
            .unwrap();

        store.clear(&state).await.unwrap();
        store.clear(&state).await.unwrap();
        store.clear("never-stored").await.unwrap();

        let result = store.consume(&state).await;
        assert!(matches!(result, Err(FlowError::AttemptAlreadyConsumed)));
    }

    #[tokio::test]
    async fn cleanup_drops_expired_records() {
        let store = InMemoryAttemptStore::new();

        let live = Attempt::new(issue_state(), "v1".to_string(), 300);
        let mut stale = Attempt::new(issue_state(), "v2".to_string(), 300);
        stale.expires_at = Utc::now() - Duration::minutes(1);

        let live_state = live.state.clone();
        store.create(live).await.unwrap();
        store.create(stale).await.unwrap();

        let cleaned = store.cleanup_expired().await.unwrap();
        assert_eq!(cleaned, 1);
        assert!(store.consume(&live_state).await.is_ok());
    }

    #[tokio::test]
    async fn overlapping_attempts_do_not_interfere() {
        let store = InMemoryAttemptStore::new();
        let first = Attempt::new(issue_state(), "verifier-a".to_string(), 300);
        let second = Attempt::new(issue_state(), "verifier-b".to_string(), 300);
        let (s1, s2) = (first.state.clone(), second.state.clone());

        store.create(first).await.unwrap();
        store.create(second).await.unwrap();

        let b = store.consume(&s2).await.unwrap();
        assert_eq!(b.code_verifier.as_deref(), Some("verifier-b"));

        let a = store.consume(&s1).await.unwrap();
        assert_eq!(a.code_verifier.as_deref(), Some("verifier-a"));
    }
}
