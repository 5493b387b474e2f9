//! Consent negotiation: loading what the consent screen shows, and
//! submitting the user's decision.

use crate::error::{ConsentError, ConsentResult};
use crate::types::{
    ApiErrorBody, ConsentConfig, ConsentContext, ConsentDecisionResponse, ConsentParams,
    RedirectTo,
};
use grove_identity_core::{AppInfo, SessionUser};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Talks to the authorization server's consent endpoints.
pub struct ConsentNegotiator {
    http_client: Client,
    config: ConsentConfig,
}

impl ConsentNegotiator {
    pub fn new(config: ConsentConfig) -> Self {
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self::with_http_client(config, http_client)
    }

    /// Reuse an existing client (and its cookie jar), e.g. the one a
    /// `LoginBridge` just authenticated.
    pub fn with_http_client(config: ConsentConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Load the consent context: the requesting app's metadata and the
    /// current session user.
    ///
    /// The two reads are issued concurrently. A failed session read
    /// yields `user: None` rather than failing the call - the screen
    /// renders app metadata regardless, and `decide` blocks approval
    /// until identity is known.
    pub async fn load_context(&self, client_id: &str, scope: &str) -> ConsentResult<ConsentContext> {
        let (app, user) = tokio::join!(
            self.fetch_app_info(client_id, scope),
            self.fetch_session_user()
        );

        let app = app?;
        let user = user.ok();

        debug!(
            app = %app.app_name,
            session = user.is_some(),
            "loaded consent context"
        );

        Ok(ConsentContext { app, user })
    }

    /// Submit the decision and return the URL the server tells us to
    /// navigate to. Returned verbatim; the caller follows it exactly
    /// once without rewriting it.
    ///
    /// Approving without a known session user fails with
    /// `NotAuthenticated` before any network call; denying is always
    /// permitted.
    pub async fn decide(
        &self,
        ctx: &ConsentContext,
        approved: bool,
        params: &ConsentParams,
    ) -> ConsentResult<RedirectTo> {
        if approved && ctx.user.is_none() {
            return Err(ConsentError::NotAuthenticated);
        }

        let url = Url::parse(&format!("{}/oauth/authorize/consent", self.config.api_base))?;

        let form = [
            ("client_id", params.client_id.as_str()),
            ("redirect_uri", params.redirect_uri.as_str()),
            ("scope", params.scope.as_str()),
            ("state", params.state.as_str()),
            ("code_challenge", params.code_challenge.as_str()),
            ("code_challenge_method", params.code_challenge_method.as_str()),
            ("approved", if approved { "true" } else { "false" }),
        ];

        let response = self.http_client.post(url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let description = ApiErrorBody::describe(&text, status);
            error!(%status, "consent submission failed: {description}");
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(ConsentError::NotAuthenticated);
            }
            return Err(ConsentError::ConsentSubmitFailed(description));
        }

        let decision: ConsentDecisionResponse = response
            .json()
            .await
            .map_err(|e| ConsentError::InvalidRedirectResponse(e.to_string()))?;

        info!(approved, "consent decision submitted");

        Ok(RedirectTo(decision.redirect_to))
    }

    async fn fetch_app_info(&self, client_id: &str, scope: &str) -> ConsentResult<AppInfo> {
        let url = Url::parse(&format!("{}/oauth/authorize/info", self.config.api_base))?;

        let response = self
            .http_client
            .get(url)
            .query(&[("client_id", client_id), ("scope", scope)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ConsentError::AppInfoFetchFailed(ApiErrorBody::describe(
                &text, status,
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_session_user(&self) -> ConsentResult<SessionUser> {
        let url = Url::parse(&format!("{}/auth/me", self.config.api_base))?;

        let response = self.http_client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ConsentError::NotAuthenticated);
        }

        Ok(response.json().await?)
    }
}
