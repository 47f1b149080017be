//! Server configuration module
//! Handles configuration parameters for the todo server

use crate::constants::{
    DEFAULT_ENRICH_TIMEOUT_SECS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_MINUTES,
};
use crate::error::{Result, RustyTodoError};
use std::env;
use std::time::Duration;

/// Argon2 cost overrides; `None` keeps the argon2 crate default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub m_cost: Option<u32>,
    /// Number of iterations
    pub t_cost: Option<u32>,
    /// Degree of parallelism
    pub p_cost: Option<u32>,
}

/// Server configuration parameters
#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// JWT secret for token signing/validation
    pub jwt_secret: String,
    /// Lifetime of issued access tokens
    pub token_ttl: chrono::Duration,
    /// Argon2 cost parameters
    pub hash_cost: HashCost,
    /// Endpoint of the description enrichment service (disabled when unset)
    pub enrich_url: Option<String>,
    pub enrich_api_key: Option<String>,
    pub enrich_timeout: Duration,
    /// Mark the access token cookie as Secure
    pub secure_cookies: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .field("enrich_url", &self.enrich_url)
            .field("enrich_api_key", &self.enrich_api_key.as_ref().map(|_| "<redacted>"))
            .field("enrich_timeout", &self.enrich_timeout)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "unit-tests-only-signing-key-never-in-production-9f8e7d".to_string(),
            token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            hash_cost: HashCost {
                m_cost: Some(1024),
                t_cost: Some(1),
                p_cost: Some(1),
            },
            enrich_url: None,
            enrich_api_key: None,
            enrich_timeout: Duration::from_secs(DEFAULT_ENRICH_TIMEOUT_SECS),
            secure_cookies: false,
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(RustyTodoError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "changeme",
            "test-secret",
            "default",
            "secret",
            "password",
            "12345",
        ];

        let lowered = secret.to_lowercase();
        for pattern in &insecure_patterns {
            if lowered.contains(pattern) {
                return Err(RustyTodoError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyTodoError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("RUSTY_TODO_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = parse_or("RUSTY_TODO_PORT", lookup("RUSTY_TODO_PORT"), DEFAULT_PORT)?;

        let jwt_secret = lookup("RUSTY_TODO_JWT_SECRET")
            .or_else(|| lookup("JWT_SECRET"))
            .ok_or_else(|| {
                RustyTodoError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;
        Self::validate_jwt_secret(&jwt_secret)?;

        let ttl_minutes: i64 = parse_or(
            "RUSTY_TODO_TOKEN_TTL_MINUTES",
            lookup("RUSTY_TODO_TOKEN_TTL_MINUTES"),
            DEFAULT_TOKEN_TTL_MINUTES,
        )?;
        if ttl_minutes <= 0 {
            return Err(RustyTodoError::ConfigError(
                "RUSTY_TODO_TOKEN_TTL_MINUTES must be greater than zero".to_string(),
            ));
        }

        let hash_cost = HashCost {
            m_cost: parse_opt("RUSTY_TODO_ARGON2_M", lookup("RUSTY_TODO_ARGON2_M"))?,
            t_cost: parse_opt("RUSTY_TODO_ARGON2_T", lookup("RUSTY_TODO_ARGON2_T"))?,
            p_cost: parse_opt("RUSTY_TODO_ARGON2_P", lookup("RUSTY_TODO_ARGON2_P"))?,
        };

        let enrich_url = lookup("RUSTY_TODO_ENRICH_URL").filter(|u| !u.trim().is_empty());
        let enrich_api_key = lookup("RUSTY_TODO_ENRICH_API_KEY").filter(|k| !k.is_empty());
        let enrich_timeout_secs = parse_or(
            "RUSTY_TODO_ENRICH_TIMEOUT_SECS",
            lookup("RUSTY_TODO_ENRICH_TIMEOUT_SECS"),
            DEFAULT_ENRICH_TIMEOUT_SECS,
        )?;

        let secure_cookies = lookup("RUSTY_TODO_SECURE_COOKIES")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl: chrono::Duration::minutes(ttl_minutes),
            hash_cost,
            enrich_url,
            enrich_api_key,
            enrich_timeout: Duration::from_secs(enrich_timeout_secs),
            secure_cookies,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T> {
    Ok(parse_opt(key, raw)?.unwrap_or(default))
}

fn parse_opt<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                RustyTodoError::ConfigError(format!("Invalid value for {}: {}", key, value))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const GOOD_KEY: &str = "Zq8-integration-signing-key-9f7e6d5c4b3a2918";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    #[should_panic(expected = "ServerConfig::default() is not allowed for security reasons")]
    fn test_default_panics() {
        let _ = ServerConfig::default();
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.jwt_secret.contains("tests"));
        assert_eq!(config.token_ttl, chrono::Duration::minutes(30));
    }

    #[test]
    fn test_requires_secret() {
        let result = ServerConfig::from_lookup(lookup_from(&[]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_defaults_with_secret() {
        let config = ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", GOOD_KEY)])).unwrap();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.token_ttl, chrono::Duration::minutes(30));
        assert_eq!(config.hash_cost, HashCost::default());
        assert!(config.enrich_url.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_prefixed_secret_wins() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "Other-signing-key-for-fallback-path-7a6b5c4d3e"),
            ("RUSTY_TODO_JWT_SECRET", GOOD_KEY),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, GOOD_KEY);
    }

    #[test]
    fn test_weak_secrets_rejected() {
        for weak in [
            "short",
            "my-secret-value-that-is-long-enough-0000",
            "onlyalphabeticcharactersinthisverylongkeyvalue",
            "Password-Is-Long-Enough-But-Still-Bad-42424242",
        ] {
            let result = ServerConfig::from_lookup(lookup_from(&[("JWT_SECRET", weak)]));
            assert!(result.is_err(), "should reject {}", weak);
        }
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", GOOD_KEY),
            ("RUSTY_TODO_PORT", "9090"),
            ("RUSTY_TODO_TOKEN_TTL_MINUTES", "5"),
            ("RUSTY_TODO_ARGON2_M", "4096"),
            ("RUSTY_TODO_ENRICH_URL", "http://localhost:7000/enrich"),
            ("RUSTY_TODO_SECURE_COOKIES", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.token_ttl, chrono::Duration::minutes(5));
        assert_eq!(config.hash_cost.m_cost, Some(4096));
        assert_eq!(config.hash_cost.t_cost, None);
        assert_eq!(config.enrich_url.as_deref(), Some("http://localhost:7000/enrich"));
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let bad_port = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", GOOD_KEY),
            ("RUSTY_TODO_PORT", "eighty"),
        ]));
        assert!(bad_port.unwrap_err().to_string().contains("RUSTY_TODO_PORT"));

        let zero_ttl = ServerConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", GOOD_KEY),
            ("RUSTY_TODO_TOKEN_TTL_MINUTES", "0"),
        ]));
        assert!(zero_ttl.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::for_testing();
        let printed = format!("{:?}", config);
        assert!(!printed.contains(&config.jwt_secret));
        assert!(printed.contains("<redacted>"));
    }
}
