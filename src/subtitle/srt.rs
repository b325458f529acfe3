// SRT subtitle format
use super::SubtitleEntry;
use crate::error::Result;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, warn};

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d+):(\d{2}):(\d{2}),(\d{3})$")
        .expect("Invalid regex")
});

/// Render a time in seconds as `HH:MM:SS,mmm`.
///
/// Milliseconds are rounded; a result of 1000 carries into the seconds.
/// Negative and non-finite input renders as zero.
pub fn format_timestamp(seconds: f64) -> String {
    let t = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let whole = t.floor();
    let mut total_secs = whole as u64;
    let mut millis = ((t - whole) * 1000.0).round() as u64;
    if millis >= 1000 {
        total_secs += 1;
        millis -= 1000;
    }

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render entries as SRT blocks, each followed by a blank line.
pub fn format_srt(entries: &[SubtitleEntry]) -> String {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\n{} --> {}\n{}\n\n",
                entry.index,
                format_timestamp(entry.start),
                format_timestamp(entry.end),
                entry.text
            )
        })
        .collect()
}

pub async fn write_srt(path: &Path, entries: &[SubtitleEntry]) -> Result<()> {
    fs::write(path, format_srt(entries)).await?;
    debug!("Wrote {} subtitle entries to {}", entries.len(), path.display());
    Ok(())
}

/// Parse SRT text into entries.
///
/// Multi-line text is joined with `\n`. Blocks without a valid index or
/// time range line are skipped.
pub fn parse_srt(content: &str) -> Vec<SubtitleEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines().peekable();

    while lines.peek().is_some() {
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        let Some(index_line) = lines.next() else {
            break;
        };
        let index_line = index_line.trim().trim_start_matches('\u{feff}');
        let Ok(index) = index_line.parse::<usize>() else {
            warn!("Skipping SRT block with invalid index line: {:?}", index_line);
            skip_block(&mut lines);
            continue;
        };

        let Some((start, end)) = lines.next().and_then(|l| parse_time_range(l.trim())) else {
            warn!("Skipping SRT block {} without a valid time range", index);
            skip_block(&mut lines);
            continue;
        };

        let mut text = Vec::new();
        while let Some(line) = lines.next_if(|l| !l.trim().is_empty()) {
            text.push(line.trim_end());
        }

        entries.push(SubtitleEntry {
            index,
            start,
            end,
            text: text.join("\n"),
        });
    }

    entries
}

fn skip_block<'a, I: Iterator<Item = &'a str>>(lines: &mut std::iter::Peekable<I>) {
    while lines.next_if(|l| !l.trim().is_empty()).is_some() {}
}

fn parse_time_range(line: &str) -> Option<(f64, f64)> {
    let caps = TIME_RANGE.captures(line)?;
    let field = |i: usize| caps[i].parse::<u64>().ok();
    let to_secs = |h: u64, m: u64, s: u64, ms: u64| (h * 3600 + m * 60 + s) as f64 + ms as f64 / 1000.0;

    let start = to_secs(field(1)?, field(2)?, field(3)?, field(4)?);
    let end = to_secs(field(5)?, field(6)?, field(7)?, field(8)?);
    Some((start, end))
}
