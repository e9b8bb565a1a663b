//! API key generation, hashing, and credential parsing.

use sha2::{Digest, Sha256};

use crate::models::{ApiKeyCredential, ApiKeyRole};

/// API key prefix.
const KEY_PREFIX: &str = "rpt_";
/// Random bytes in a key (hex encoded, so the key carries twice as many chars).
const KEY_RANDOM_BYTES: usize = 24;
/// Length of a hex-encoded SHA-256 digest.
const HASH_LENGTH: usize = 64;

/// Generate a new random API key. Shown to the user once; only its hash is configured.
pub fn generate_key() -> String {
    let random_part: [u8; KEY_RANDOM_BYTES] = rand::random();
    format!("{}{}", KEY_PREFIX, hex::encode(random_part))
}

/// Hash an API key using SHA-256.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Configuration entry (`username:hash:role`) for a key.
pub fn credential_entry(username: &str, key: &str, role: ApiKeyRole) -> String {
    format!("{}:{}:{}", username, hash_key(key), role)
}

/// Parse a comma-separated list of `username:sha256-hex:role` entries.
pub fn parse_credentials(spec: &str) -> Result<Vec<ApiKeyCredential>, String> {
    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').collect();
            let [username, key_hash, role] = parts.as_slice() else {
                return Err(format!(
                    "expected 'username:hash:role', found {} field(s)",
                    parts.len()
                ));
            };
            if username.is_empty() {
                return Err("empty username".to_string());
            }
            if key_hash.len() != HASH_LENGTH || !key_hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(format!("key hash for '{}' is not a SHA-256 hex digest", username));
            }
            let role = ApiKeyRole::parse(role)
                .ok_or_else(|| format!("invalid role '{}' for '{}'", role, username))?;
            Ok(ApiKeyCredential {
                username: username.to_string(),
                key_hash: key_hash.to_lowercase(),
                role,
            })
        })
        .collect()
}
