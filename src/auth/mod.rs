//! Authentication: API key verification for reporting routes.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::ReportingUser;

use crate::config::Config;
use crate::models::{ApiKeyCredential, ApiKeyRole, AuthenticatedUser};
use crate::services::api_key::hash_key;

/// Wrapper type for the bootstrap admin key.
/// Uses `SecretString` to prevent accidental logging and zeroize on drop.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    /// Create a new AdminKey from an optional string.
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    /// Constant-time comparison with the stored admin key.
    /// Unequal lengths compare false without an early exit.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}

/// Credentials the reporting routes authenticate against.
#[derive(Debug, Clone)]
pub struct Credentials {
    security_enabled: bool,
    api_keys: Vec<ApiKeyCredential>,
    admin_key: AdminKey,
}

impl Credentials {
    pub fn new(security_enabled: bool, api_keys: Vec<ApiKeyCredential>, admin_key: AdminKey) -> Self {
        Self {
            security_enabled,
            api_keys,
            admin_key,
        }
    }

    /// Security disabled: every caller is anonymous.
    pub fn disabled() -> Self {
        Self::new(false, Vec::new(), AdminKey::new(None))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.security_enabled,
            config.api_keys.clone(),
            AdminKey::new(config.admin_key.clone()),
        )
    }

    pub fn security_enabled(&self) -> bool {
        self.security_enabled
    }

    /// Resolve an API key to its user.
    ///
    /// Every configured hash is compared so the time taken does not reveal
    /// which entry matched.
    pub fn verify_api_key(&self, key: &str) -> Option<AuthenticatedUser> {
        let provided = hash_key(key);
        let mut found = None;
        for credential in &self.api_keys {
            let equal: bool = credential
                .key_hash
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into();
            if equal && found.is_none() {
                found = Some(AuthenticatedUser {
                    username: credential.username.clone(),
                    role: credential.role,
                });
            }
        }
        found
    }

    /// Resolve the bootstrap admin key.
    pub fn verify_admin_key(&self, key: &str) -> Option<AuthenticatedUser> {
        self.admin_key.verify(key).then(|| AuthenticatedUser {
            username: "admin".to_string(),
            role: ApiKeyRole::Admin,
        })
    }
}
