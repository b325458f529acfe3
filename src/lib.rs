pub mod audio;
pub mod config;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod subtitle;
pub mod transcribe;
pub mod translate;

pub use config::Config;
pub use error::{HindisubError, Result};
pub use pipeline::{print_summary, Pipeline, PipelineResult, PipelineStats};
