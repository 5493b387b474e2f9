//! The flow client: starts authorization attempts and handles the
//! callback return, including the code-for-token exchange and identity
//! resolution.

use crate::authorize::build_authorization_url;
use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use crate::pkce::PkceChallenge;
use crate::state::{Attempt, AttemptStore, issue_state, verify_state};
use crate::types::{CallbackOutcome, CallbackParams, TokenErrorBody, TokenResponse};
use grove_identity_core::Identity;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Client for the authorization code flow with PKCE.
#[derive(Clone)]
pub struct FlowClient {
    http_client: Client,
    store: Arc<dyn AttemptStore>,
    config: FlowConfig,
}

impl FlowClient {
    pub fn new(config: FlowConfig, store: Arc<dyn AttemptStore>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            store,
            config,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<dyn AttemptStore> {
        &self.store
    }

    /// Start a fresh authorization attempt.
    ///
    /// Generates a PKCE pair and a state token, persists the attempt
    /// record, and returns the redirect URL together with the state that
    /// keys the attempt. Each call produces new secrets; a failed
    /// attempt's values are never reused.
    pub async fn begin_authorization(&self) -> FlowResult<(Url, String)> {
        let pkce = PkceChallenge::generate()?;
        let state = issue_state();

        let url = build_authorization_url(&self.config, &state, &pkce.code_challenge)?;

        self.store
            .create(Attempt::new(
                state.clone(),
                pkce.code_verifier,
                self.config.attempt_ttl_seconds,
            ))
            .await?;

        debug!(client_id = %self.config.client_id, "generated authorization URL");

        Ok((url, state))
    }

    /// Handle the redirect back from the authorization server.
    ///
    /// Runs the callback state machine: server-reported error, missing
    /// code, state/CSRF check, verifier check, token exchange, identity
    /// fetch. The attempt is consumed (secrets erased) on every terminal
    /// path; a replayed invocation resolves to
    /// `CallbackOutcome::AlreadyHandled` without touching the network.
    pub async fn handle_callback(&self, params: CallbackParams) -> FlowResult<CallbackOutcome> {
        if let Some(err) = &params.error {
            if let Some(state) = &params.state {
                self.store.clear(state).await?;
            }
            error!(error = %err, "authorization server reported an error");
            return Err(FlowError::AuthorizationDenied(err.clone()));
        }

        let Some(code) = params.code.as_deref() else {
            if let Some(state) = &params.state {
                self.store.clear(state).await?;
            }
            return Err(FlowError::NoCode);
        };

        let Some(state) = params.state.as_deref() else {
            return Err(FlowError::CsrfMismatch);
        };

        let attempt = match self.store.consume(state).await {
            Ok(attempt) => attempt,
            Err(FlowError::AttemptAlreadyConsumed) => {
                debug!(%state, "callback replayed; attempt already handled");
                return Ok(CallbackOutcome::AlreadyHandled);
            }
            Err(FlowError::AttemptNotFound) => return Err(FlowError::CsrfMismatch),
            Err(e) => return Err(e),
        };

        if !verify_state(state, Some(attempt.state.as_str())) {
            return Err(FlowError::CsrfMismatch);
        }

        let Some(verifier) = attempt.code_verifier else {
            return Err(FlowError::MissingVerifier);
        };

        let tokens = self.exchange_code(code, &verifier).await?;
        let identity = self.fetch_identity(&tokens.access_token).await?;

        info!(sub = %identity.sub, "authorization flow completed");

        Ok(CallbackOutcome::Authenticated { tokens, identity })
    }

    /// Exchange the authorization code for tokens. Issued exactly once per
    /// attempt; authorization codes are single-use, so there is no retry.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> FlowResult<TokenResponse> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = self.config.client_secret.as_deref() {
            params.push(("client_secret", secret));
        }
        params.push(("code_verifier", code_verifier));

        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let description = serde_json::from_str::<TokenErrorBody>(&body)
                .ok()
                .and_then(|b| b.error_description.or(b.error))
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body.clone()
                    }
                });
            error!(%status, "token exchange failed: {description}");
            return Err(FlowError::TokenExchangeFailed(description));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| FlowError::InvalidTokenResponse(e.to_string()))?;

        debug!("exchanged authorization code for tokens");
        Ok(tokens)
    }

    /// Resolve the authenticated identity with the bearer token. Only
    /// runs after a successful exchange.
    async fn fetch_identity(&self, access_token: &str) -> FlowResult<Identity> {
        let response = self
            .http_client
            .get(&self.config.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FlowError::IdentityFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "userinfo request failed");
            return Err(FlowError::IdentityFetchFailed(if body.is_empty() {
                status.to_string()
            } else {
                body
            }));
        }

        let identity: Identity = response
            .json()
            .await
            .map_err(|e| FlowError::InvalidUserInfoResponse(e.to_string()))?;

        debug!(sub = %identity.sub, "resolved identity");
        Ok(identity)
    }
}
