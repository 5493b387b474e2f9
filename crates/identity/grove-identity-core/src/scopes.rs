//! The closed catalog of scopes the authorization server can grant.
//!
//! Consent renderers resolve scope names through this table instead of
//! reflecting over arbitrary metadata; names the catalog does not know
//! fall back to the server-provided description.

use serde::{Deserialize, Serialize};

/// Icon associated with a scope on the consent screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScopeIcon {
    Key,
    User,
    Mail,
    GraduationCap,
    Activity,
    Globe,
    Wallet,
    Refresh,
}

/// Static descriptor for one known scope.
#[derive(Debug, Clone, Copy)]
pub struct ScopeDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub claims: &'static [&'static str],
    pub icon: ScopeIcon,
}

impl ScopeDescriptor {
    /// Look a scope up by name. Unknown names return `None`.
    pub fn lookup(name: &str) -> Option<&'static ScopeDescriptor> {
        SCOPE_CATALOG.iter().find(|s| s.name == name)
    }
}

pub const SCOPE_CATALOG: &[ScopeDescriptor] = &[
    ScopeDescriptor {
        name: "openid",
        description: "OpenID Connect identity",
        claims: &["sub", "iss", "aud", "iat", "exp"],
        icon: ScopeIcon::Key,
    },
    ScopeDescriptor {
        name: "profile",
        description: "User profile information",
        claims: &["display_name", "username", "avatar_url", "bio"],
        icon: ScopeIcon::User,
    },
    ScopeDescriptor {
        name: "email",
        description: "Email address",
        claims: &["email", "email_verified"],
        icon: ScopeIcon::Mail,
    },
    ScopeDescriptor {
        name: "cohort",
        description: "Cohort information",
        claims: &["cohort_id", "cohort_name", "enrollment_date"],
        icon: ScopeIcon::GraduationCap,
    },
    ScopeDescriptor {
        name: "activity",
        description: "User activity and stats",
        claims: &["posts_count", "streak_days", "last_active"],
        icon: ScopeIcon::Activity,
    },
    ScopeDescriptor {
        name: "socials",
        description: "Social media links",
        claims: &["twitter", "github", "linkedin", "website"],
        icon: ScopeIcon::Globe,
    },
    ScopeDescriptor {
        name: "wallet",
        description: "Blockchain wallet address",
        claims: &["wallet_address", "chain"],
        icon: ScopeIcon::Wallet,
    },
    ScopeDescriptor {
        name: "offline_access",
        description: "Long-lived refresh tokens",
        claims: &["refresh_token"],
        icon: ScopeIcon::Refresh,
    },
];
