pub mod extract;

pub use extract::{check_ffmpeg, FfmpegExtractor};

use crate::error::Result;
use crate::naming;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Container/codec of every extracted audio file.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Copies the audio track of a video into a standalone audio file.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Write the audio track of `video` to `output`.
    async fn extract(&self, video: &Path, output: &Path) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Extract the audio of `video` to `<stem>_audio.mp3` beside it and return that path.
pub async fn extract_audio(extractor: &dyn AudioExtractor, video: &Path) -> Result<PathBuf> {
    let audio_path = naming::audio_path(video, AUDIO_EXTENSION);

    info!("Loading video clip at {}", video.display());
    extractor.extract(video, &audio_path).await?;

    info!("Audio extraction successful: {}", audio_path.display());
    Ok(audio_path)
}
