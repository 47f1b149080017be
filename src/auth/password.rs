//! Argon2id password hashing
//!
//! Digests are PHC strings, so salt and cost parameters travel with the
//! hash and verification always recomputes with the parameters it was
//! created with.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::HashCost;
use crate::error::{Result, RustyTodoError};

/// One-way adaptive password hasher
pub struct PasswordHasher {
    params: Params,
    /// Digest verified against when the username is unknown
    dummy_digest: String,
}

impl PasswordHasher {
    /// Creates a hasher from configured cost overrides
    pub fn from_cost(cost: &HashCost) -> Result<Self> {
        let defaults = Params::default();
        let params = Params::new(
            cost.m_cost.unwrap_or(defaults.m_cost()),
            cost.t_cost.unwrap_or(defaults.t_cost()),
            cost.p_cost.unwrap_or(defaults.p_cost()),
            None,
        )
        .map_err(|e| RustyTodoError::ConfigError(format!("Invalid Argon2 parameters: {}", e)))?;
        Self::with_params(params)
    }

    /// Creates a hasher with explicit Argon2 parameters
    pub fn with_params(params: Params) -> Result<Self> {
        let mut hasher = Self {
            params,
            dummy_digest: String::new(),
        };
        hasher.dummy_digest = hasher.hash("dummy password for unknown users")?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| RustyTodoError::HashError(e.to_string()))
    }

    /// Verify a plaintext against a stored digest
    ///
    /// A digest that does not parse never verifies.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                log::warn!(target: "security", "Stored password digest is malformed: {}", e);
                false
            }
        }
    }

    /// Burn the same work as a real verification, always failing
    pub fn verify_dummy(&self, plaintext: &str) -> bool {
        let _ = self.verify(plaintext, &self.dummy_digest);
        false
    }
}
