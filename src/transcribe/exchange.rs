//! The `_json.json` exchange file holding the raw recognition result.

use super::TranscriptResult;
use crate::error::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Serialize `transcript` to `path` with four-space indentation.
pub async fn write_transcript(transcript: &TranscriptResult, path: &Path) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    transcript.serialize(&mut serializer)?;
    buf.push(b'\n');

    fs::write(path, &buf).await?;
    debug!("Wrote {} bytes to {}", buf.len(), path.display());
    Ok(())
}

/// Read an exchange file back.
///
/// Only `segments[].start`, `end` and `text` are required; anything else the
/// engine wrote is carried along untouched.
pub async fn read_transcript(path: &Path) -> Result<TranscriptResult> {
    let contents = fs::read_to_string(path).await?;
    let transcript = serde_json::from_str(&contents)?;
    Ok(transcript)
}
