//! Shared, read-only application state handed to every request

use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenManager};
use crate::config::ServerConfig;
use crate::constants::DEFAULT_TOKEN_TTL_MINUTES;
use crate::error::Result;
use crate::storage::StorageProvider;
use crate::todos::{Enricher, HttpEnricher, NoopEnricher};

/// Everything a request handler needs; set once at startup, never mutated
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub hasher: Arc<PasswordHasher>,
    pub storage: Arc<dyn StorageProvider>,
    pub enricher: Arc<dyn Enricher>,
    pub token_ttl: chrono::Duration,
    pub secure_cookies: bool,
}

impl AppState {
    /// Create state with default token lifetime and no enrichment
    pub fn new(
        tokens: TokenManager,
        hasher: PasswordHasher,
        storage: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            tokens: Arc::new(tokens),
            hasher: Arc::new(hasher),
            storage,
            enricher: Arc::new(NoopEnricher),
            token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            secure_cookies: false,
        }
    }

    /// Build state from loaded configuration
    pub fn from_config(config: &ServerConfig, storage: Arc<dyn StorageProvider>) -> Result<Self> {
        let hasher = PasswordHasher::from_cost(&config.hash_cost)?;
        let mut state = Self::new(TokenManager::new(&config.jwt_secret), hasher, storage)
            .with_token_ttl(config.token_ttl);
        state.secure_cookies = config.secure_cookies;

        if let Some(ref url) = config.enrich_url {
            log::info!("Description enrichment enabled via {}", url);
            let enricher = HttpEnricher::new(
                url.clone(),
                config.enrich_api_key.clone(),
                config.enrich_timeout,
            )?;
            state = state.with_enricher(Arc::new(enricher));
        }

        Ok(state)
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}
