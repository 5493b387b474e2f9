//! Core protocol types shared across the Grove identity stack.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod scopes;

pub use scopes::{SCOPE_CATALOG, ScopeDescriptor, ScopeIcon};

/// Resolved identity returned by the userinfo endpoint.
///
/// Which optional claims are populated depends on the scopes granted to
/// the access token. Claims this crate does not model explicitly are kept
/// in `additional_claims`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub sub: String,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub bio: Option<String>,
    pub cohort: Option<String>,
    /// Platform name to profile URL.
    pub socials: Option<HashMap<String, String>>,
    pub wallet_address: Option<String>,
    #[serde(flatten)]
    pub additional_claims: HashMap<String, serde_json::Value>,
}

impl Identity {
    /// Best human-readable label: display name, then the local part of the
    /// email address, then the subject identifier.
    pub fn display_label(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        if let Some(email) = self.email.as_deref() {
            return email.split('@').next().unwrap_or(email);
        }
        &self.sub
    }
}

/// The current first-party session user, as reported by `GET /auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub cohort: Option<String>,
    pub bio: Option<String>,
    pub wallet_address: Option<String>,
}

impl SessionUser {
    pub fn display_label(&self) -> &str {
        self.email
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Metadata about the requesting application, rendered on the consent
/// screen. Served by `GET /oauth/authorize/info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    pub app_name: String,
    pub app_icon_url: Option<String>,
    pub app_description: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub scopes: Vec<ScopeGrant>,
}

/// One requested scope as declared by the authorization server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeGrant {
    pub name: String,
    pub description: String,
    pub claims: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(name: Option<&str>, email: Option<&str>) -> Identity {
        Identity {
            sub: "u-1".to_string(),
            email: email.map(str::to_string),
            email_verified: None,
            name: name.map(str::to_string),
            picture: None,
            bio: None,
            cohort: None,
            socials: None,
            wallet_address: None,
            additional_claims: HashMap::new(),
        }
    }

    #[test]
    fn display_label_prefers_name() {
        let id = identity(Some("Ada"), Some("ada@example.com"));
        assert_eq!(id.display_label(), "Ada");
    }

    #[test]
    fn display_label_falls_back_to_email_local_part() {
        let id = identity(None, Some("ada@example.com"));
        assert_eq!(id.display_label(), "ada");
    }

    #[test]
    fn display_label_falls_back_to_subject() {
        let id = identity(None, None);
        assert_eq!(id.display_label(), "u-1");
    }

    #[test]
    fn identity_preserves_unknown_claims() {
        let raw = serde_json::json!({
            "sub": "u-2",
            "email": "x@example.com",
            "posts_count": 42,
            "streak_days": 7
        });

        let id: Identity = serde_json::from_value(raw).unwrap();
        assert_eq!(id.sub, "u-2");
        assert_eq!(
            id.additional_claims.get("posts_count"),
            Some(&serde_json::json!(42))
        );
        assert_eq!(
            id.additional_claims.get("streak_days"),
            Some(&serde_json::json!(7))
        );
    }

    #[test]
    fn app_info_deserializes_scope_grants() {
        let raw = serde_json::json!({
            "app_name": "Demo Client",
            "app_icon_url": null,
            "app_description": "A demo",
            "privacy_policy_url": null,
            "scopes": [
                {"name": "openid", "description": "OpenID Connect identity", "claims": ["sub"]},
                {"name": "email", "description": "Email address", "claims": ["email", "email_verified"]}
            ]
        });

        let info: AppInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(info.app_name, "Demo Client");
        assert_eq!(info.scopes.len(), 2);
        assert_eq!(info.scopes[1].claims, vec!["email", "email_verified"]);
    }
}
