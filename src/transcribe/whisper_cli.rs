use super::{RecognitionOptions, SpeechRecognizer, TranscriptResult};
use crate::error::{HindisubError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Runs the locally installed `whisper` command with word timestamps enabled.
pub struct WhisperCliRecognizer {
    command: String,
}

impl WhisperCliRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn build_command(&self, audio: &Path, output_dir: &Path, options: &RecognitionOptions) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(audio)
            .arg("--model")
            .arg(options.model_size.as_str())
            .arg("--language")
            .arg(&options.language)
            .arg("--task")
            .arg("transcribe")
            .arg("--word_timestamps")
            .arg("True")
            .arg("--output_format")
            .arg("json")
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--verbose")
            .arg("False")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl Default for WhisperCliRecognizer {
    fn default() -> Self {
        Self::new("whisper")
    }
}

/// Where `whisper` writes its JSON: the audio file name minus its last extension.
fn output_file(output_dir: &Path, audio: &Path) -> PathBuf {
    let stem = audio
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    output_dir.join(format!("{stem}.json"))
}

fn parse_output(contents: &str) -> Result<TranscriptResult> {
    serde_json::from_str(contents).map_err(|e| {
        HindisubError::Transcription(format!("Unexpected whisper output: {e}"))
    })
}

#[async_trait]
impl SpeechRecognizer for WhisperCliRecognizer {
    async fn recognize(
        &self,
        audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<TranscriptResult> {
        let scratch = tempfile::tempdir()?;
        let mut cmd = self.build_command(audio, scratch.path(), options);
        debug!("Running {:?}", cmd.as_std());

        let output = cmd.output().await.map_err(|e| {
            HindisubError::Transcription(format!(
                "Failed to run '{}'. Install it with: pip install openai-whisper. Error: {e}",
                self.command
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HindisubError::Transcription(format!(
                "whisper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let json_path = output_file(scratch.path(), audio);
        let contents = fs::read_to_string(&json_path).await.map_err(|e| {
            HindisubError::Transcription(format!(
                "whisper did not produce {}: {e}",
                json_path.display()
            ))
        })?;

        let transcript = parse_output(&contents)?;
        debug!("whisper returned {} segments", transcript.segments.len());
        Ok(transcript)
    }

    fn name(&self) -> &'static str {
        "whisper"
    }
}
