use anyhow::{Context, Result};
use clap::Parser;
use hindisub::config::{Config, ModelSize, Provider, TranslationMode};
use hindisub::{print_summary, Pipeline};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hindisub")]
#[command(version, about = "Generate Hindi subtitles for a video")]
#[command(
    long_about = "Extract the audio of a video, transcribe it with Whisper into an SRT file, and translate that file to Hindi."
)]
struct Cli {
    /// Input video file
    input: PathBuf,

    /// Speech recognition provider: local, openai
    #[arg(short, long)]
    provider: Option<Provider>,

    /// Whisper model size: tiny, base, small, medium, large
    #[arg(short, long)]
    model_size: Option<ModelSize>,

    /// Spoken language of the video (e.g., en)
    #[arg(short, long)]
    source_language: Option<String>,

    /// Language to translate subtitles into (e.g., hi)
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translate every line of the SRT file (lines) or only subtitle text (entries)
    #[arg(long)]
    mode: Option<TranslationMode>,

    /// Config file (defaults to <config dir>/hindisub/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Hide progress spinners
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model_size) = self.model_size {
            config.model_size = model_size;
        }
        if let Some(ref lang) = self.source_language {
            config.source_language = lang.clone();
        }
        if let Some(ref lang) = self.target_language {
            config.target_language = lang.clone();
        }
        if let Some(mode) = self.mode {
            config.translation_mode = mode;
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config
        .validate()
        .context("Configuration validation failed")?;

    info!("Input:    {}", cli.input.display());
    info!("Provider: {} (model: {})", config.provider, config.model_size);
    info!(
        "Language: {} -> {} ({} mode)",
        config.source_language, config.target_language, config.translation_mode
    );

    let pipeline = Pipeline::from_config(&config)?.with_progress(!cli.quiet);
    let result = pipeline
        .run(&cli.input)
        .await
        .with_context(|| format!("Failed to generate subtitles for {}", cli.input.display()))?;

    print_summary(&result);
    Ok(())
}
