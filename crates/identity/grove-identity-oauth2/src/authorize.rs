//! Authorization request construction.

use crate::config::FlowConfig;
use crate::error::{FlowError, FlowResult};
use url::Url;

/// Build the authorization redirect URL.
///
/// Query keys are appended in a fixed order: `response_type`, `client_id`,
/// `redirect_uri`, `scope`, `state`, `code_challenge`,
/// `code_challenge_method`. Pure construction; the only failures are an
/// empty endpoint/client id or an unparseable endpoint.
pub fn build_authorization_url(
    config: &FlowConfig,
    state: &str,
    code_challenge: &str,
) -> FlowResult<Url> {
    if config.authorization_endpoint.is_empty() {
        return Err(FlowError::InvalidConfig(
            "authorization_endpoint is empty".to_string(),
        ));
    }
    if config.client_id.is_empty() {
        return Err(FlowError::InvalidConfig("client_id is empty".to_string()));
    }

    let mut url = Url::parse(&config.authorization_endpoint)?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("response_type", "code");
        params.append_pair("client_id", &config.client_id);
        params.append_pair("redirect_uri", &config.redirect_uri);
        params.append_pair("scope", &config.scopes.join(" "));
        params.append_pair("state", state);
        params.append_pair("code_challenge", code_challenge);
        params.append_pair("code_challenge_method", "S256");
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> FlowConfig {
        FlowConfig::new("abc", "https://id.example.com", "https://app/cb")
            .with_scopes(vec!["openid".to_string(), "email".to_string()])
    }

    #[test]
    fn builds_expected_query() {
        let url = build_authorization_url(&config(), "S1", "C1").unwrap();

        assert_eq!(url.host_str(), Some("id.example.com"));
        assert_eq!(url.path(), "/oauth/authorize");

        let params: HashMap<_, _> = url.query_pairs().collect();
        assert_eq!(params.get("response_type"), Some(&"code".into()));
        assert_eq!(params.get("client_id"), Some(&"abc".into()));
        assert_eq!(params.get("redirect_uri"), Some(&"https://app/cb".into()));
        assert_eq!(params.get("scope"), Some(&"openid email".into()));
        assert_eq!(params.get("state"), Some(&"S1".into()));
        assert_eq!(params.get("code_challenge"), Some(&"C1".into()));
        assert_eq!(params.get("code_challenge_method"), Some(&"S256".into()));
    }

    #[test]
    fn query_key_order_is_fixed() {
        let url = build_authorization_url(&config(), "S1", "C1").unwrap();
        let keys: Vec<_> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(
            keys,
            vec![
                "response_type",
                "client_id",
                "redirect_uri",
                "scope",
                "state",
                "code_challenge",
                "code_challenge_method",
            ]
        );
    }

    #[test]
    fn rejects_empty_client_id() {
        let mut cfg = config();
        cfg.client_id = String::new();
        let result = build_authorization_url(&cfg, "S1", "C1");
        assert!(matches!(result, Err(FlowError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_empty_endpoint() {
        let mut cfg = config();
        cfg.authorization_endpoint = String::new();
        let result = build_authorization_url(&cfg, "S1", "C1");
        assert!(matches!(result, Err(FlowError::InvalidConfig(_))));
    }
}
