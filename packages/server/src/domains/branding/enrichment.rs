//! Advisory LLM enrichment.
//!
//! The model's answer is a suggestion. Callers must be ready to fill every
//! field themselves, so failures here are reported but never fatal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::models::PartialBrandProfile;
use crate::common::truncate_chars;
use crate::kernel::BaseAI;

/// Markup beyond this many characters is not sent to the model
pub const MAX_PROMPT_HTML_CHARS: usize = 60_000;

/// How long the model gets before the heuristics take over
pub const DEFAULT_ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(20);

const BRAND_PROMPT: &str = "Extract all available brand and product information from the following website HTML.

Return a JSON object with these keys:
- title: Brand/company name
- fonts: Array of font family names used
- colors: Array of color hex codes used (e.g. \"#1A2B3C\")
- logo: Absolute or root-relative URL of the logo image
- description: Short brand description
- productImages: Array of product image URLs (if any)

If any field is missing, return an empty array or empty string for that field. Only return valid JSON.";

#[async_trait]
pub trait BrandEnricher: Send + Sync {
    /// Suggest brand attributes for a page's raw markup.
    async fn enrich(&self, html: &str) -> Result<PartialBrandProfile>;

    /// Whether a model is consulted at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Enricher backed by a language model.
pub struct AiBrandEnricher {
    ai: Arc<dyn BaseAI>,
    timeout: Duration,
}

impl AiBrandEnricher {
    pub fn new(ai: Arc<dyn BaseAI>) -> Self {
        Self {
            ai,
            timeout: DEFAULT_ENRICHMENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl BrandEnricher for AiBrandEnricher {
    async fn enrich(&self, html: &str) -> Result<PartialBrandProfile> {
        let prompt = format!(
            "{}\n\n{}",
            BRAND_PROMPT,
            truncate_chars(html, MAX_PROMPT_HTML_CHARS)
        );

        let raw = tokio::time::timeout(self.timeout, self.ai.complete_json(&prompt))
            .await
            .with_context(|| format!("Model did not answer within {:?}", self.timeout))??;
        let value: Value = serde_json::from_str(llm_client::strip_code_blocks(&raw))
            .context("Model response is not valid JSON")?;
        if !value.is_object() {
            anyhow::bail!("Model response is not a JSON object");
        }

        let partial = PartialBrandProfile::from_json(&value);
        debug!(
            has_title = partial.title.is_some(),
            colors = partial.colors.len(),
            fonts = partial.fonts.len(),
            has_logo = partial.logo.is_some(),
            product_images = partial.product_images.len(),
            "Brand enrichment parsed"
        );
        Ok(partial)
    }
}

/// Used when no model is configured: every field takes the fallback path.
pub struct NoopBrandEnricher;

#[async_trait]
impl BrandEnricher for NoopBrandEnricher {
    async fn enrich(&self, _html: &str) -> Result<PartialBrandProfile> {
        Ok(PartialBrandProfile::default())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockAI;

    #[tokio::test]
    async fn test_enrich_parses_fenced_json() {
        let ai = Arc::new(MockAI::new().with_response(
            "```json\n{\"title\":\"Acme\",\"colors\":[\"#123456\"],\"fonts\":[],\"logo\":\"\",\"productImages\":[]}\n```",
        ));
        let enricher = AiBrandEnricher::new(ai.clone());

        let partial = enricher.enrich("<html></html>").await.unwrap();
        assert_eq!(partial.title.as_deref(), Some("Acme"));
        assert_eq!(partial.colors, vec!["#123456"]);
        assert!(partial.logo.is_none());
        assert!(ai.was_called_with("productImages"));
    }

    #[tokio::test]
    async fn test_enrich_rejects_non_json() {
        let ai = Arc::new(MockAI::new().with_response("I could not find a brand."));
        let enricher = AiBrandEnricher::new(ai);
        assert!(enricher.enrich("<html></html>").await.is_err());
    }

    #[tokio::test]
    async fn test_enrich_rejects_non_object_json() {
        let ai = Arc::new(MockAI::new().with_response("[\"#fff\"]"));
        let enricher = AiBrandEnricher::new(ai);
        assert!(enricher.enrich("<html></html>").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrich_gives_up_on_stalled_model() {
        let enricher = AiBrandEnricher::new(Arc::new(MockAI::new().hanging()))
            .with_timeout(Duration::from_secs(5));

        let err = enricher.enrich("<html></html>").await.unwrap_err();
        assert!(err.to_string().contains("did not answer"));
    }

    #[tokio::test]
    async fn test_prompt_markup_is_capped() {
        let ai = Arc::new(MockAI::new().with_response("{}"));
        let enricher = AiBrandEnricher::new(ai.clone());
        let html = "x".repeat(MAX_PROMPT_HTML_CHARS + 500);

        enricher.enrich(&html).await.unwrap();
        let prompt = ai.last_prompt().unwrap();
        assert!(prompt.len() < BRAND_PROMPT.len() + MAX_PROMPT_HTML_CHARS + 10);
    }
}
