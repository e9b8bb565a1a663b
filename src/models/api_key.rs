//! API key credentials and the authenticated reporting user.

use serde::{Deserialize, Serialize};

/// Roles attached to API keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyRole {
    Admin,
    #[default]
    Contributor,
    Viewer,
}

impl ApiKeyRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Contributor => "contributor",
            Self::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "contributor" => Some(Self::Contributor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Whether this role may use reporting at all.
    pub fn can_use_reporting(&self) -> bool {
        !matches!(self, Self::Viewer)
    }
}

impl std::fmt::Display for ApiKeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A configured API key. Only the SHA-256 hash of the key is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyCredential {
    pub username: String,
    /// Hex-encoded SHA-256 of the full key
    pub key_hash: String,
    pub role: ApiKeyRole,
}

/// User resolved from the request's credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: ApiKeyRole,
}

impl AuthenticatedUser {
    /// Check if the user has admin role.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, ApiKeyRole::Admin)
    }
}
