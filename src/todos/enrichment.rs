//! Description enrichment collaborator
//!
//! An external service may expand a short todo description into a longer
//! one. It is strictly best-effort: `enrich_or_original` never fails and
//! hands back the caller's text whenever the service cannot help.

use async_trait::async_trait;
use pulldown_cmark::{Event, Parser, TagEnd};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DESCRIPTION_MAX_LEN, DESCRIPTION_MIN_LEN};
use crate::error::{Result, RustyTodoError};

/// Something that can expand a todo description
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, text: &str) -> Result<String>;

    /// Get the enricher name for logging/debugging
    fn enricher_name(&self) -> &'static str;
}

/// Enricher that leaves text untouched
pub struct NoopEnricher;

#[async_trait]
impl Enricher for NoopEnricher {
    async fn enrich(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn enricher_name(&self) -> &'static str {
        "NOOP"
    }
}

#[derive(Serialize)]
struct EnrichRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EnrichResponse {
    text: String,
}

/// Enricher backed by an HTTP text-expansion service
///
/// Sends `{"text": ...}` and expects `{"text": ...}` back.
pub struct HttpEnricher {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpEnricher {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RustyTodoError::ConfigError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn enrich(&self, text: &str) -> Result<String> {
        let mut request = self.client.post(&self.endpoint).json(&EnrichRequest { text });
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response: EnrichResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(strip_markdown(&response.text))
    }

    fn enricher_name(&self) -> &'static str {
        "HTTP"
    }
}

/// Run the enricher, falling back to the original text on any failure
///
/// Answers that are empty or too long for a description are discarded too.
pub async fn enrich_or_original(enricher: &dyn Enricher, text: &str) -> String {
    match enricher.enrich(text).await {
        Ok(enriched) => {
            let enriched = enriched.trim();
            let len = enriched.chars().count();
            if (DESCRIPTION_MIN_LEN..=DESCRIPTION_MAX_LEN).contains(&len) {
                enriched.to_string()
            } else {
                log::warn!(
                    "{} enricher returned {} characters; keeping original description",
                    enricher.enricher_name(),
                    len
                );
                text.to_string()
            }
        }
        Err(e) => {
            log::warn!(
                "{} enricher unavailable, keeping original description: {}",
                enricher.enricher_name(),
                e
            );
            text.to_string()
        }
    }
}

/// Reduce a markdown answer to its plain text
///
/// Block ends and line breaks become newlines; markup, link targets and
/// raw HTML are dropped.
pub fn strip_markdown(input: &str) -> String {
    let mut text = String::with_capacity(input.len());
    for event in Parser::new(input) {
        match event {
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }
    text.trim().to_string()
}
