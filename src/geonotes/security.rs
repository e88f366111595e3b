//! Password hashing and token generation.
//!
//! Passwords are stored as Argon2id PHC strings. Activation tokens and login
//! session ids come from the OS random source.

use crate::error::{GeonotesError, Result};
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ACTIVATION_TOKEN_BYTES: usize = 40;

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Hasher {
    params: Params,
}

impl Default for Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Hasher {
    pub fn new(config: &HasherConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| GeonotesError::PasswordHash(format!("invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| GeonotesError::PasswordHash(e.to_string()))
    }

    /// `false` for a wrong password and for a stored hash that does not parse.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                log::warn!("Stored password hash could not be parsed: {}", e);
                false
            }
        }
    }
}

/// URL-safe one-time token for account activation.
pub fn generate_activation_token() -> String {
    let mut bytes = [0u8; ACTIVATION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Hasher {
        Hasher::new(&HasherConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn hash_verifies_and_is_not_plaintext() {
        let hasher = fast();
        let hash = hasher.hash_password("longenough1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("longenough1"));
        assert!(hasher.verify_password("longenough1", &hash));
        assert!(!hasher.verify_password("wrong-password", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = fast();
        let a = hasher.hash_password("secret123").unwrap();
        let b = hasher.hash_password("secret123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_a_mismatch() {
        assert!(!fast().verify_password("secret123", "plaintext"));
    }

    #[test]
    fn rejects_impossible_parameters() {
        let err = Hasher::new(&HasherConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        })
        .unwrap_err();
        assert_eq!(err.kind(), "PasswordHashError");
    }

    #[test]
    fn activation_tokens_are_url_safe_and_unique() {
        let a = generate_activation_token();
        let b = generate_activation_token();
        assert_ne!(a, b);
        // 40 bytes -> 54 base64 chars without padding
        assert_eq!(a.len(), 54);
        assert!(a
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn session_ids_are_uuids() {
        assert!(Uuid::parse_str(&new_session_id()).is_ok());
    }
}
