use crate::error::{HindisubError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default endpoint of the Google web-translate service.
pub const DEFAULT_TRANSLATE_URL: &str = "https://translate.googleapis.com";

/// Which speech recognition engine runs the transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// The locally installed `whisper` command.
    #[default]
    Local,
    /// The OpenAI transcription API.
    OpenAi,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Local => write!(f, "local"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Provider::Local),
            "openai" => Ok(Provider::OpenAi),
            _ => Err(format!("Unknown provider: {}. Use 'local' or 'openai'", s)),
        }
    }
}

/// Whisper model size, trading accuracy for speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            _ => Err(format!(
                "Unknown model size: {}. Use 'tiny', 'base', 'small', 'medium' or 'large'",
                s
            )),
        }
    }
}

/// How the English subtitle file is fed to the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Every line of the file is translated, including indices, time ranges
    /// and blank separators.
    #[default]
    Lines,
    /// Only the text of each subtitle entry is translated; numbering and
    /// timing are kept.
    Entries,
}

impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationMode::Lines => write!(f, "lines"),
            TranslationMode::Entries => write!(f, "entries"),
        }
    }
}

impl std::str::FromStr for TranslationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(TranslationMode::Lines),
            "entries" => Ok(TranslationMode::Entries),
            _ => Err(format!(
                "Unknown translation mode: {}. Use 'lines' or 'entries'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: Provider,
    pub model_size: ModelSize,
    pub source_language: String,
    pub target_language: String,
    pub translation_mode: TranslationMode,
    pub whisper_command: String,
    pub ffmpeg_command: String,
    pub translate_url: String,
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model_size: ModelSize::default(),
            source_language: "en".to_string(),
            target_language: "hi".to_string(),
            translation_mode: TranslationMode::default(),
            whisper_command: "whisper".to_string(),
            ffmpeg_command: "ffmpeg".to_string(),
            translate_url: DEFAULT_TRANSLATE_URL.to_string(),
            openai_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit file, or from the default location
    /// if none is given, then apply `OPENAI_API_KEY`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(HindisubError::FileNotFound(path.display().to_string()));
                }
                Self::from_file(path)?
            }
            None => match Self::config_file_path() {
                Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                    warn!("Ignoring config file {}: {}", path.display(), e);
                    Self::default()
                }),
                _ => Self::default(),
            },
        };

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                config.openai_api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Parse a TOML config file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_language_code("source_language", &self.source_language)?;
        validate_language_code("target_language", &self.target_language)?;

        if self.provider == Provider::OpenAi && self.openai_api_key.is_none() {
            return Err(HindisubError::Config(
                "OPENAI_API_KEY not set. Export it with: export OPENAI_API_KEY=sk-...".to_string(),
            ));
        }

        if self.whisper_command.trim().is_empty() || self.ffmpeg_command.trim().is_empty() {
            return Err(HindisubError::Config(
                "whisper_command and ffmpeg_command must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hindisub").join("config.toml"))
    }
}

/// Accepts ISO 639 style codes such as `en`, `hi` or `zh-CN`.
fn validate_language_code(field: &str, code: &str) -> Result<()> {
    let (primary, region) = match code.split_once('-') {
        Some((p, r)) => (p, Some(r)),
        None => (code, None),
    };

    let primary_ok =
        (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic());
    let region_ok = region.map_or(true, |r| {
        !r.is_empty() && r.len() <= 4 && r.chars().all(|c| c.is_ascii_alphanumeric())
    });

    if primary_ok && region_ok {
        Ok(())
    } else {
        Err(HindisubError::Config(format!(
            "{field} must be a language code like 'en' or 'hi', got '{code}'"
        )))
    }
}
