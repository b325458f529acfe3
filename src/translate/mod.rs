pub mod google;

pub use google::GoogleTranslator;

use crate::config::TranslationMode;
use crate::error::{HindisubError, Result};
use crate::naming;
use crate::subtitle::{parse_srt, write_srt, SubtitleEntry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

/// External text translation engine.
#[async_trait]
pub trait LineTranslator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Produces `<stem>_hindi_subtitles.srt` from an English subtitle file.
pub struct SubtitleTranslator {
    translator: Box<dyn LineTranslator>,
    source_lang: String,
    target_lang: String,
    mode: TranslationMode,
}

impl SubtitleTranslator {
    pub fn new(
        translator: Box<dyn LineTranslator>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            translator,
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            mode: TranslationMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn translator_name(&self) -> &'static str {
        self.translator.name()
    }

    /// Translate `english` and return the path of the translated file.
    ///
    /// The first failed translation call aborts the run; lines already
    /// written stay in the output file.
    pub async fn translate_file(&self, english: &Path) -> Result<PathBuf> {
        if !english.exists() {
            return Err(HindisubError::FileNotFound(english.display().to_string()));
        }

        let output = naming::hindi_subtitle_path(english);
        info!(
            "Translating {} ({} -> {}, {} mode)",
            english.display(),
            self.source_lang,
            self.target_lang,
            self.mode
        );

        let count = match self.mode {
            TranslationMode::Lines => self.translate_lines(english, &output).await?,
            TranslationMode::Entries => self.translate_entries(english, &output).await?,
        };

        info!("Translation saved in {} ({} translated)", output.display(), count);
        Ok(output)
    }

    /// Every input line, whatever it holds, becomes one translated output line.
    async fn translate_lines(&self, english: &Path, output: &Path) -> Result<usize> {
        let mut writer = BufWriter::new(File::create(output).await?);
        let mut lines = BufReader::new(File::open(english).await?).lines();
        let mut count = 0;

        while let Some(line) = lines.next_line().await? {
            let translated = self.translate_text(line.trim()).await?;
            writer.write_all(translated.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            count += 1;
        }

        writer.flush().await?;
        Ok(count)
    }

    /// Only entry text is translated; numbering and time ranges are kept.
    async fn translate_entries(&self, english: &Path, output: &Path) -> Result<usize> {
        let content = fs::read_to_string(english).await?;
        let entries = parse_srt(&content);
        let mut translated = Vec::with_capacity(entries.len());

        for entry in entries {
            let mut lines = Vec::new();
            for line in entry.text.lines() {
                lines.push(self.translate_text(line.trim()).await?);
            }
            translated.push(SubtitleEntry {
                text: without_blank_lines(&lines.join("\n")),
                ..entry
            });
        }

        write_srt(output, &translated).await?;
        Ok(translated.len())
    }

    async fn translate_text(&self, text: &str) -> Result<String> {
        debug!("Translating {:?}", text);
        self.translator
            .translate(text, &self.source_lang, &self.target_lang)
            .await
    }
}

/// Drop blank lines so translated text cannot end an SRT block early.
fn without_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
