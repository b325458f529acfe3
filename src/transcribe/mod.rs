pub mod exchange;
pub mod openai;
pub mod whisper_cli;

pub use exchange::{read_transcript, write_transcript};
pub use openai::OpenAiRecognizer;
pub use whisper_cli::WhisperCliRecognizer;

use crate::config::ModelSize;
use crate::error::{HindisubError, Result};
use crate::naming;
use crate::subtitle::{convert_to_subtitles, srt};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// A time-bounded unit of recognized speech.
///
/// Fields the engine reports beyond `start`, `end` and `text` (word timings,
/// token ids, probabilities) are kept in `extra` so the exchange file keeps
/// the engine's full output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// Timestamped output of a speech recognition run, segments in time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TranscriptResult {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            extra: Map::new(),
        }
    }
}

/// Settings handed to the recognition engine for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    pub model_size: ModelSize,
    pub language: String,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            model_size: ModelSize::default(),
            language: "en".to_string(),
        }
    }
}

/// External speech-to-text engine producing segment timestamps.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<TranscriptResult>;
    fn name(&self) -> &'static str;
}

/// Turns an audio file into an English subtitle file.
pub struct Transcriber {
    recognizer: Box<dyn SpeechRecognizer>,
    options: RecognitionOptions,
}

impl Transcriber {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>, options: RecognitionOptions) -> Self {
        Self {
            recognizer,
            options,
        }
    }

    pub fn recognizer_name(&self) -> &'static str {
        self.recognizer.name()
    }

    /// Recognize speech in `audio`, persist the raw result as `<stem>_json.json`
    /// and format it into `<stem>_subtitles.srt`.
    ///
    /// Returns `Ok(None)` when the exchange file cannot be read back; the
    /// failure has been logged and no subtitle file exists.
    pub async fn transcribe(&self, audio: &Path) -> Result<Option<PathBuf>> {
        if !audio.exists() {
            return Err(HindisubError::FileNotFound(format!(
                "The file {} does not exist.",
                audio.display()
            )));
        }

        let srt_path = naming::subtitle_path(audio);
        let json_path = naming::transcript_path(audio);

        info!(
            "Starting transcription with {} (model: {}, language: {})",
            self.recognizer.name(),
            self.options.model_size,
            self.options.language
        );
        let result = self.recognizer.recognize(audio, &self.options).await?;

        info!("Writing transcription to {}", json_path.display());
        write_transcript(&result, &json_path).await?;

        let Some(entries) = json_to_srt(&json_path, &srt_path).await? else {
            return Ok(None);
        };

        info!(
            "Transcribed audio to {} ({} entries)",
            srt_path.display(),
            entries
        );
        Ok(Some(srt_path))
    }
}

/// Format the exchange file at `json_path` into an SRT file at `srt_path`.
///
/// Decode and I/O errors on the exchange file are logged and yield
/// `Ok(None)` without touching `srt_path`. Errors writing the SRT file
/// propagate.
pub async fn json_to_srt(json_path: &Path, srt_path: &Path) -> Result<Option<usize>> {
    let transcript = match read_transcript(json_path).await {
        Ok(t) => t,
        Err(HindisubError::Json(e)) => {
            error!(
                "JSON decode error in {}: {} (line {}, column {})",
                json_path.display(),
                e,
                e.line(),
                e.column()
            );
            return Ok(None);
        }
        Err(HindisubError::Io(e)) => {
            error!("I/O error reading {}: {}", json_path.display(), e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let entries = convert_to_subtitles(&transcript.segments);
    srt::write_srt(srt_path, &entries).await?;
    Ok(Some(entries.len()))
}
