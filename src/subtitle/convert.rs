use super::SubtitleEntry;
use crate::transcribe::Segment;

/// Convert transcript segments to subtitle entries.
///
/// Entries are numbered from 1 in segment order and carry the segment text
/// with surrounding whitespace removed. Timing is copied as-is; overlap is
/// not checked.
pub fn convert_to_subtitles(segments: &[Segment]) -> Vec<SubtitleEntry> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| SubtitleEntry {
            index: i + 1,
            start: segment.start,
            end: segment.end,
            text: segment.text.trim().to_string(),
        })
        .collect()
}
