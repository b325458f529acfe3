use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{HindisubError, Result};

use super::AudioExtractor;

/// Check if FFmpeg is installed and accessible.
pub async fn check_ffmpeg(command: &str) -> Result<()> {
    let output = Command::new(command)
        .arg("-version")
        .output()
        .await
        .map_err(|e| {
            HindisubError::AudioExtraction(format!(
                "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
            ))
        })?;

    if !output.status.success() {
        return Err(HindisubError::AudioExtraction(
            "FFmpeg check failed".to_string(),
        ));
    }

    debug!("FFmpeg is available");
    Ok(())
}

/// Extracts audio by running the `ffmpeg` command.
pub struct FfmpegExtractor {
    command: String,
}

impl FfmpegExtractor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for FfmpegExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video: &Path, output: &Path) -> Result<()> {
        check_ffmpeg(&self.command).await?;

        // Removes a half-written file unless extraction completes.
        let mut guard = PartialOutput::new(output);

        info!("Writing audio to file: {}", output.display());

        let child = Command::new(&self.command)
            .args(["-y", "-hide_banner", "-loglevel", "error", "-i"])
            .arg(video)
            .args(["-vn", "-acodec", "libmp3lame", "-q:a", "2"])
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| HindisubError::AudioExtraction(format!("Failed to run FFmpeg: {e}")))?;

        let result = child.wait_with_output().await.map_err(|e| {
            HindisubError::AudioExtraction(format!("Failed to wait for FFmpeg: {e}"))
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(HindisubError::AudioExtraction(format!(
                "FFmpeg failed on {}: {}",
                video.display(),
                stderr.trim()
            )));
        }

        if !output.exists() {
            return Err(HindisubError::AudioExtraction(
                "Output file was not created".to_string(),
            ));
        }

        guard.commit();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ffmpeg"
    }
}

/// Deletes the output file on drop unless committed.
struct PartialOutput<'a> {
    path: &'a Path,
    committed: bool,
}

impl<'a> PartialOutput<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            committed: false,
        }
    }

    fn commit(&mut self) {
        self.committed = true;
    }
}

impl Drop for PartialOutput<'_> {
    fn drop(&mut self) {
        if self.committed || !self.path.exists() {
            return;
        }
        match std::fs::remove_file(self.path) {
            Ok(()) => debug!("Removed partial audio file {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove partial audio file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
