pub mod convert;
pub mod srt;

pub use convert::convert_to_subtitles;
pub use srt::{format_srt, format_timestamp, parse_srt, write_srt};

/// One display block of a subtitle file. Times are in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}
