use super::{RecognitionOptions, SpeechRecognizer, TranscriptResult};
use crate::error::{HindisubError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// OpenAI transcription API base URL.
const OPENAI_API_URL: &str = "https://api.openai.com";

/// Maximum upload size accepted by the API (25 MB).
const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// The hosted API serves a single model; `model_size` does not apply here.
const OPENAI_MODEL: &str = "whisper-1";

/// OpenAI transcription API client.
pub struct OpenAiRecognizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiRecognizer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Point the client at a different server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn build_form(&self, audio: &Path, language: &str) -> Result<Form> {
        let file_bytes = fs::read(audio).await?;
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let mime_type = match audio.extension().and_then(|e| e.to_str()) {
            Some("mp3") => "audio/mpeg",
            Some("wav") => "audio/wav",
            Some("m4a") => "audio/mp4",
            Some("flac") => "audio/flac",
            Some("ogg") => "audio/ogg",
            _ => "application/octet-stream",
        };

        let file_part = Part::bytes(file_bytes)
            .file_name(file_name)
            .mime_str(mime_type)?;

        Ok(Form::new()
            .part("file", file_part)
            .text("model", OPENAI_MODEL)
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .text("timestamp_granularities[]", "word")
            .text("language", language.to_string()))
    }
}

#[async_trait]
impl SpeechRecognizer for OpenAiRecognizer {
    async fn recognize(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<TranscriptResult> {
        let metadata = fs::metadata(audio).await?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(HindisubError::Transcription(format!(
                "File too large for the OpenAI API: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_FILE_SIZE
            )));
        }

        let form = self.build_form(audio, &options.language).await?;
        let response = self
            .client
            .post(format!("{}/v1/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("OpenAI API response status: {}", status);

        if !status.is_success() {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(HindisubError::Transcription(format!(
                    "OpenAI API error: {} ({})",
                    api_error.error.message, api_error.error.r#type
                )));
            }
            return Err(HindisubError::Transcription(format!(
                "OpenAI API error ({}): {}",
                status, body
            )));
        }

        let transcript: TranscriptResult = serde_json::from_str(&body)?;
        debug!("OpenAI returned {} segments", transcript.segments.len());
        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    r#type: String,
}
