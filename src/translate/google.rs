//! Translation through the Google web-translate endpoint.

use crate::config::DEFAULT_TRANSLATE_URL;
use crate::error::{HindisubError, Result};
use crate::translate::LineTranslator;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Translator backed by the public `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_TRANSLATE_URL)
    }

    /// Use a different server, e.g. a proxy or a test double.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

/// Join the translated chunks of a response.
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` pairs, one per sentence.
fn parse_response(body: &str) -> Result<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| HindisubError::Translation(format!("Failed to parse response: {}", e)))?;

    let chunks = value
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| HindisubError::Translation(format!("Unexpected response: {}", body)))?;

    Ok(chunks
        .iter()
        .filter_map(|chunk| chunk.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl LineTranslator for GoogleTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        // The endpoint answers empty input with a bare `null` body.
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| HindisubError::Translation(format!("Translation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HindisubError::Translation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(HindisubError::Translation(format!(
                "Translation API error ({}): {}",
                status, body
            )));
        }

        let translated = parse_response(&body)?;
        debug!("Translated {} chars into {} chars", text.len(), translated.len());
        Ok(translated)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
