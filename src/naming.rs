//! Derived file names for the artifacts of a run.
//!
//! Every artifact lives next to the input video and is named after its stem,
//! the part of the file name before the first `.`: `clip.mp4` yields
//! `clip_audio.mp3`, `clip_json.json`, `clip_subtitles.srt` and
//! `clip_hindi_subtitles.srt`.

use std::path::{Path, PathBuf};

pub const AUDIO_SUFFIX: &str = "_audio";
pub const JSON_SUFFIX: &str = "_json";
pub const SUBTITLES_SUFFIX: &str = "_subtitles";
pub const HINDI_SUBTITLES_SUFFIX: &str = "_hindi_subtitles";

/// Marker searched for when deriving the Hindi file from an English subtitle file.
const SUBTITLE_MARKER: &str = "_subtitle";

/// File name up to the first `.`.
pub fn stem(path: &Path) -> String {
    let name = file_name(path);
    match name.split_once('.') {
        Some((head, _)) => head.to_string(),
        None => name,
    }
}

/// File name up to the last occurrence of `marker`, falling back to [`stem`]
/// when the marker is absent. The marker ends the stem, so a marker inside
/// the video's own name is kept.
pub fn stem_before(path: &Path, marker: &str) -> String {
    let name = file_name(path);
    match name.rfind(marker) {
        Some(pos) => name[..pos].to_string(),
        None => stem(path),
    }
}

/// `<stem>_audio.<extension>` next to the video.
pub fn audio_path(video: &Path, extension: &str) -> PathBuf {
    sibling(video, format!("{}{AUDIO_SUFFIX}.{extension}", stem(video)))
}

/// `<stem>_json.json` next to the extracted audio.
pub fn transcript_path(audio: &Path) -> PathBuf {
    sibling(
        audio,
        format!("{}{JSON_SUFFIX}.json", stem_before(audio, AUDIO_SUFFIX)),
    )
}

/// `<stem>_subtitles.srt` next to the extracted audio.
pub fn subtitle_path(audio: &Path) -> PathBuf {
    sibling(
        audio,
        format!("{}{SUBTITLES_SUFFIX}.srt", stem_before(audio, AUDIO_SUFFIX)),
    )
}

/// `<stem>_hindi_subtitles.srt` next to the English subtitle file.
pub fn hindi_subtitle_path(subtitles: &Path) -> PathBuf {
    sibling(
        subtitles,
        format!(
            "{}{HINDI_SUBTITLES_SUFFIX}.srt",
            stem_before(subtitles, SUBTITLE_MARKER)
        ),
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sibling(path: &Path, name: String) -> PathBuf {
    path.with_file_name(name)
}
