//! Login bridging: exchanging a third-party identity assertion for a
//! first-party session before the consent step.

use crate::error::{ConsentError, ConsentResult};
use crate::negotiator::ConsentNegotiator;
use crate::types::{ApiErrorBody, ConsentConfig, ConsentParams, LoginResponse};
use grove_identity_core::SessionUser;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Result of one bridge invocation.
#[derive(Debug)]
pub enum BridgeOutcome {
    Bridged(BridgedSession),
    /// The exchange already ran for this bridge instance; nothing was
    /// sent to the network.
    AlreadyBridged,
}

/// Exchanges an externally obtained identity assertion for a first-party
/// session cookie, at most once per instance.
///
/// The once-guard covers the interactive login hazard: a re-rendering
/// host invoking `exchange` twice gets `AlreadyBridged` the second time
/// instead of a duplicate login round-trip. A failed exchange is
/// terminal for this instance; restarting the flow constructs a fresh
/// bridge.
pub struct LoginBridge {
    http_client: Client,
    config: ConsentConfig,
    exchanged: AtomicBool,
}

impl LoginBridge {
    pub fn new(config: ConsentConfig) -> Self {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            config,
            exchanged: AtomicBool::new(false),
        }
    }

    /// Exchange the assertion for a session. The success response sets
    /// the session cookie on this bridge's cookie jar.
    pub async fn exchange(&self, assertion: &str) -> ConsentResult<BridgeOutcome> {
        if self.exchanged.swap(true, Ordering::SeqCst) {
            debug!("session exchange already ran for this bridge");
            return Ok(BridgeOutcome::AlreadyBridged);
        }

        let url = Url::parse(&format!(
            "{}/auth/login/{}",
            self.config.api_base, self.config.provider
        ))?;

        let mut body = serde_json::Map::new();
        body.insert(
            format!("{}_token", self.config.provider),
            serde_json::Value::String(assertion.to_string()),
        );

        let response = self.http_client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let description = ApiErrorBody::describe(&text, status);
            error!(%status, "session exchange failed: {description}");
            return Err(ConsentError::SessionExchangeFailed(description));
        }

        let login: LoginResponse = response.json().await?;
        info!(user = %login.user.id, "bridged external login to first-party session");

        Ok(BridgeOutcome::Bridged(BridgedSession {
            http_client: self.http_client.clone(),
            config: self.config.clone(),
            user: login.user,
        }))
    }
}

/// Proof of a successful session exchange. Forwarding into consent is a
/// capability of this value, so a failed exchange can never forward.
#[derive(Debug, Clone)]
pub struct BridgedSession {
    http_client: Client,
    config: ConsentConfig,
    pub user: SessionUser,
}

impl BridgedSession {
    /// The consent URL to forward to, carrying every original
    /// authorization parameter.
    pub fn consent_url(&self, consent_base: &str, params: &ConsentParams) -> ConsentResult<Url> {
        let mut url = Url::parse(consent_base)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", &params.client_id);
            query.append_pair("redirect_uri", &params.redirect_uri);
            query.append_pair("scope", &params.scope);
            query.append_pair("state", &params.state);
            query.append_pair("code_challenge", &params.code_challenge);
            query.append_pair("code_challenge_method", &params.code_challenge_method);
        }
        Ok(url)
    }

    /// A negotiator sharing this session's cookie jar, so the consent
    /// calls are credentialed with the session just established.
    pub fn negotiator(&self) -> ConsentNegotiator {
        ConsentNegotiator::with_http_client(self.config.clone(), self.http_client.clone())
    }
}
