use crate::audio::{extract_audio, AudioExtractor, FfmpegExtractor};
use crate::config::{Config, Provider};
use crate::error::{HindisubError, Result};
use crate::naming;
use crate::transcribe::{
    OpenAiRecognizer, RecognitionOptions, SpeechRecognizer, Transcriber, WhisperCliRecognizer,
};
use crate::translate::{GoogleTranslator, SubtitleTranslator};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Timings of one run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub total_time: Duration,
    pub extraction_time: Duration,
    pub transcription_time: Duration,
    pub translation_time: Duration,
}

/// Files produced by one run.
#[derive(Debug)]
pub struct PipelineResult {
    pub audio_path: PathBuf,
    pub transcript_path: PathBuf,
    pub subtitle_path: PathBuf,
    pub hindi_subtitle_path: PathBuf,
    pub stats: PipelineStats,
}

/// Video in, Hindi subtitle file out: extract, transcribe, translate.
pub struct Pipeline {
    extractor: Box<dyn AudioExtractor>,
    transcriber: Transcriber,
    translator: SubtitleTranslator,
    show_progress: bool,
}

impl Pipeline {
    pub fn new(
        extractor: Box<dyn AudioExtractor>,
        transcriber: Transcriber,
        translator: SubtitleTranslator,
    ) -> Self {
        Self {
            extractor,
            transcriber,
            translator,
            show_progress: false,
        }
    }

    /// Build the pipeline with the collaborators named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let recognizer: Box<dyn SpeechRecognizer> = match config.provider {
            Provider::Local => Box::new(WhisperCliRecognizer::new(config.whisper_command.clone())),
            Provider::OpenAi => {
                let api_key = config.openai_api_key.as_ref().ok_or_else(|| {
                    HindisubError::Config(
                        "OpenAI API key not set. Set OPENAI_API_KEY environment variable."
                            .to_string(),
                    )
                })?;
                Box::new(OpenAiRecognizer::new(api_key.clone()))
            }
        };

        let options = RecognitionOptions {
            model_size: config.model_size,
            language: config.source_language.clone(),
        };

        let translator = SubtitleTranslator::new(
            Box::new(GoogleTranslator::with_base_url(config.translate_url.clone())),
            config.source_language.clone(),
            config.target_language.clone(),
        )
        .with_mode(config.translation_mode);

        Ok(Self::new(
            Box::new(FfmpegExtractor::new(config.ffmpeg_command.clone())),
            Transcriber::new(recognizer, options),
            translator,
        ))
    }

    /// Enable or disable stage spinners.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run all three stages in order; the first error ends the run.
    pub async fn run(&self, video: &Path) -> Result<PipelineResult> {
        let start_time = Instant::now();

        if !video.exists() {
            return Err(HindisubError::FileNotFound(video.display().to_string()));
        }

        info!("Stage 1/3: Extracting audio with {}", self.extractor.name());
        let spinner = self.spinner("Extracting audio...");
        let stage_start = Instant::now();
        let audio_path = extract_audio(self.extractor.as_ref(), video).await?;
        let extraction_time = stage_start.elapsed();
        finish(spinner, format!("✓ Audio extracted to {}", audio_path.display()));

        info!(
            "Stage 2/3: Transcribing with {}",
            self.transcriber.recognizer_name()
        );
        let spinner = self.spinner("Transcribing audio...");
        let stage_start = Instant::now();
        let subtitle_path = match self.transcriber.transcribe(&audio_path).await? {
            Some(path) => path,
            None => {
                let transcript = naming::transcript_path(&audio_path);
                warn!(
                    "No subtitle file was written; inspect {}",
                    transcript.display()
                );
                return Err(HindisubError::NoSubtitles(transcript.display().to_string()));
            }
        };
        let transcription_time = stage_start.elapsed();
        finish(spinner, format!("✓ Subtitles written to {}", subtitle_path.display()));

        info!(
            "Stage 3/3: Translating with {}",
            self.translator.translator_name()
        );
        let spinner = self.spinner("Translating subtitles...");
        let stage_start = Instant::now();
        let hindi_subtitle_path = self.translator.translate_file(&subtitle_path).await?;
        let translation_time = stage_start.elapsed();
        finish(
            spinner,
            format!("✓ Translation saved to {}", hindi_subtitle_path.display()),
        );

        let stats = PipelineStats {
            total_time: start_time.elapsed(),
            extraction_time,
            transcription_time,
            translation_time,
        };

        info!(
            "Process completed. Hindi subtitles saved in: {}",
            hindi_subtitle_path.display()
        );

        Ok(PipelineResult {
            transcript_path: naming::transcript_path(&audio_path),
            audio_path,
            subtitle_path,
            hindi_subtitle_path,
            stats,
        })
    }

    fn spinner(&self, message: &'static str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

fn finish(spinner: Option<ProgressBar>, message: String) {
    if let Some(pb) = spinner {
        pb.finish_with_message(message);
    }
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                 Hindi Subtitle Generation Complete             ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Audio:       {}", result.audio_path.display());
    println!("  Transcript:  {}", result.transcript_path.display());
    println!("  Subtitles:   {}", result.subtitle_path.display());
    println!("  Hindi:       {}", result.hindi_subtitle_path.display());
    println!();
    println!("  Timing:");
    println!(
        "    Extract:     {:.2}s",
        result.stats.extraction_time.as_secs_f64()
    );
    println!(
        "    Transcribe:  {:.2}s",
        result.stats.transcription_time.as_secs_f64()
    );
    println!(
        "    Translate:   {:.2}s",
        result.stats.translation_time.as_secs_f64()
    );
    println!(
        "    Total:       {:.2}s",
        result.stats.total_time.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
