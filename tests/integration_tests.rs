//! Integration tests for hindisub
//!
//! These tests drive the stages through their public API with in-process
//! collaborators, so no FFmpeg, whisper or network access is needed.

use async_trait::async_trait;
use hindisub::audio::AudioExtractor;
use hindisub::config::TranslationMode;
use hindisub::naming;
use hindisub::subtitle::{convert_to_subtitles, format_srt, format_timestamp};
use hindisub::transcribe::{
    json_to_srt, write_transcript, RecognitionOptions, Segment, SpeechRecognizer, Transcriber,
    TranscriptResult,
};
use hindisub::translate::{LineTranslator, SubtitleTranslator};
use hindisub::{HindisubError, Pipeline, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Test doubles
// ============================================================================

/// Writes placeholder bytes where the audio should go.
struct FakeExtractor;

#[async_trait]
impl AudioExtractor for FakeExtractor {
    async fn extract(&self, _video: &Path, output: &Path) -> Result<()> {
        tokio::fs::write(output, b"ID3 fake mp3").await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Returns a fixed transcript and counts calls.
struct FixedRecognizer {
    segments: Vec<Segment>,
    calls: Arc<AtomicUsize>,
}

impl FixedRecognizer {
    fn new(segments: Vec<Segment>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                segments,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl SpeechRecognizer for FixedRecognizer {
    async fn recognize(
        &self,
        _audio: &Path,
        options: &RecognitionOptions,
    ) -> Result<TranscriptResult> {
        assert_eq!(options.language, "en");
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(TranscriptResult::new(self.segments.clone()))
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Maps a few English words to Hindi and passes everything else through.
struct DictionaryTranslator;

#[async_trait]
impl LineTranslator for DictionaryTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        Ok(match text {
            "test" => "परीक्षण".to_string(),
            "Hello" => "नमस्ते".to_string(),
            other => other.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

fn pipeline_with(segments: Vec<Segment>, mode: TranslationMode) -> (Pipeline, Arc<AtomicUsize>) {
    let (recognizer, calls) = FixedRecognizer::new(segments);
    let pipeline = Pipeline::new(
        Box::new(FakeExtractor),
        Transcriber::new(Box::new(recognizer), RecognitionOptions::default()),
        SubtitleTranslator::new(Box::new(DictionaryTranslator), "en", "hi").with_mode(mode),
    );
    (pipeline, calls)
}

// ============================================================================
// Subtitle Formatting Tests
// ============================================================================

mod formatting_tests {
    use super::*;

    #[test]
    fn test_timestamp_examples() {
        assert_eq!(format_timestamp(3725.125), "01:02:05,125");
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(59.999), "00:00:59,999");
    }

    #[test]
    fn test_timestamp_never_renders_four_digit_millis() {
        assert_eq!(format_timestamp(59.9995), "00:00:59,999");
        assert_eq!(format_timestamp(59.9996), "00:01:00,000");
    }

    #[test]
    fn test_two_segment_document() {
        let segments = vec![
            Segment::new(0.0, 1.5, " Hello "),
            Segment::new(1.5, 3.0, "World"),
        ];

        let output = format_srt(&convert_to_subtitles(&segments));

        assert_eq!(
            output,
            "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n2\n00:00:01,500 --> 00:00:03,000\nWorld\n\n"
        );
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let transcript = TranscriptResult::new(vec![
            Segment::new(0.25, 1.75, "One"),
            Segment::new(3600.5, 3602.0, " Two"),
        ]);

        let first = format_srt(&convert_to_subtitles(&transcript.segments));
        let second = format_srt(&convert_to_subtitles(&transcript.segments));
        assert_eq!(first, second);
    }
}

// ============================================================================
// Naming Tests
// ============================================================================

mod naming_tests {
    use super::*;

    #[test]
    fn test_clip_names() {
        let video = Path::new("clip.mp4");
        let audio = naming::audio_path(video, "mp3");
        let srt = naming::subtitle_path(&audio);

        assert_eq!(audio, PathBuf::from("clip_audio.mp3"));
        assert_eq!(naming::transcript_path(&audio), PathBuf::from("clip_json.json"));
        assert_eq!(srt, PathBuf::from("clip_subtitles.srt"));
        assert_eq!(
            naming::hindi_subtitle_path(&srt),
            PathBuf::from("clip_hindi_subtitles.srt")
        );
    }
}

// ============================================================================
// Transcriber Tests
// ============================================================================

mod transcriber_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_audio_skips_recognition() {
        let (recognizer, calls) = FixedRecognizer::new(vec![Segment::new(0.0, 1.0, "x")]);
        let transcriber = Transcriber::new(Box::new(recognizer), RecognitionOptions::default());

        let result = transcriber.transcribe(Path::new("/nonexistent/clip_audio.mp3")).await;

        assert!(matches!(result, Err(HindisubError::FileNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_exchange_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("clip_json.json");
        let srt = dir.path().join("clip_subtitles.srt");
        std::fs::write(&json, "{\"segments\": [ {\"start\": 0.0, ").unwrap();

        let result = json_to_srt(&json, &srt).await.unwrap();

        assert!(result.is_none());
        assert!(!srt.exists());
    }

    #[tokio::test]
    async fn test_missing_exchange_file_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let srt = dir.path().join("clip_subtitles.srt");

        let result = json_to_srt(&dir.path().join("absent_json.json"), &srt)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(!srt.exists());
    }

    #[tokio::test]
    async fn test_exchange_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("clip_json.json");
        let srt = dir.path().join("clip_subtitles.srt");
        let transcript = TranscriptResult::new(vec![Segment::new(0.0, 1.5, " Hello ")]);

        write_transcript(&transcript, &json).await.unwrap();
        assert_eq!(json_to_srt(&json, &srt).await.unwrap(), Some(1));
        assert_eq!(
            std::fs::read_to_string(&srt).unwrap(),
            "1\n00:00:00,000 --> 00:00:01,500\nHello\n\n"
        );
    }
}

// ============================================================================
// End-to-end Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_segment_video() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"not really a video").unwrap();

        let (pipeline, calls) =
            pipeline_with(vec![Segment::new(0.5, 2.0, "test")], TranslationMode::Lines);
        let result = pipeline.run(&video).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.audio_path, dir.path().join("clip_audio.mp3"));
        assert_eq!(result.transcript_path, dir.path().join("clip_json.json"));
        assert_eq!(result.subtitle_path, dir.path().join("clip_subtitles.srt"));
        assert_eq!(
            result.hindi_subtitle_path,
            dir.path().join("clip_hindi_subtitles.srt")
        );

        assert_eq!(
            std::fs::read_to_string(&result.subtitle_path).unwrap(),
            "1\n00:00:00,500 --> 00:00:02,000\ntest\n\n"
        );
        assert_eq!(
            std::fs::read_to_string(&result.hindi_subtitle_path).unwrap(),
            "1\n00:00:00,500 --> 00:00:02,000\nपरीक्षण\n\n"
        );
        assert!(result.transcript_path.exists());
    }

    #[tokio::test]
    async fn test_entries_mode_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("talk.mov");
        std::fs::write(&video, b"video").unwrap();

        let (pipeline, _) = pipeline_with(
            vec![
                Segment::new(0.0, 1.0, "Hello"),
                Segment::new(61.25, 62.0, "test"),
            ],
            TranslationMode::Entries,
        );
        let result = pipeline.run(&video).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&result.hindi_subtitle_path).unwrap(),
            "1\n00:00:00,000 --> 00:00:01,000\nनमस्ते\n\n2\n00:01:01,250 --> 00:01:02,000\nपरीक्षण\n\n"
        );
    }

    /// Counts calls and passes text through.
    struct CountingTranslator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LineTranslator for CountingTranslator {
        async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_string())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_unreadable_exchange_file_stops_before_translation() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.mp4");
        std::fs::write(&video, b"video").unwrap();

        // A non-finite start is written as `null` and cannot be read back.
        let (recognizer, recognized) =
            FixedRecognizer::new(vec![Segment::new(f64::NAN, 1.0, "lost")]);
        let translated = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new(
            Box::new(FakeExtractor),
            Transcriber::new(Box::new(recognizer), RecognitionOptions::default()),
            SubtitleTranslator::new(
                Box::new(CountingTranslator {
                    calls: translated.clone(),
                }),
                "en",
                "hi",
            ),
        );

        let result = pipeline.run(&video).await;

        assert!(matches!(result, Err(HindisubError::NoSubtitles(_))));
        assert_eq!(recognized.load(Ordering::SeqCst), 1);
        assert_eq!(translated.load(Ordering::SeqCst), 0);
        assert!(dir.path().join("clip_json.json").exists());
        assert!(!dir.path().join("clip_subtitles.srt").exists());
        assert!(!dir.path().join("clip_hindi_subtitles.srt").exists());
    }

    #[tokio::test]
    async fn test_missing_video_stops_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let (pipeline, calls) = pipeline_with(vec![], TranslationMode::Lines);

        let result = pipeline.run(&dir.path().join("missing.mp4")).await;

        assert!(matches!(result, Err(HindisubError::FileNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("missing_audio.mp3").exists());
    }
}
