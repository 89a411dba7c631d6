// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Final container assembly.
//!
//! One ffmpeg invocation merges the freshly generated symbol-carrying video
//! stream with everything else from the original: audio, subtitles, and
//! container-level metadata, all stream-copied without re-encoding. The
//! output targets Matroska, which tolerates mismatched codecs across the
//! remuxed streams.
//!
//! Stream-mapping contract: video from the generated file, audio and
//! subtitles (if any) from the original, `-c copy`, metadata from the
//! original, destination overwritten unconditionally.

use std::path::Path;
use std::process::Command;

use super::error::{spawn_error, VideoError};

/// Remux `generated` (video) against `original` (audio/subs/metadata) into
/// `output`. Both input handles must already be closed; ffmpeg needs
/// exclusive access to the generated temporary file.
pub fn remux(original: &Path, generated: &Path, output: &Path) -> Result<(), VideoError> {
    tracing::info!(
        original = %original.display(),
        generated = %generated.display(),
        output = %output.display(),
        "remuxing final container"
    );

    let result = Command::new("ffmpeg")
        .arg("-v")
        .arg("error")
        .arg("-y")
        .arg("-i")
        .arg(generated)
        .arg("-i")
        .arg(original)
        .args(["-map", "0:v:0"])
        .args(["-map", "1:a?"])
        .args(["-map", "1:s?"])
        .args(["-c", "copy"])
        .args(["-map_metadata", "1"])
        .arg(output)
        .output()
        .map_err(|e| spawn_error("ffmpeg", e))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(VideoError::ToolFailed {
            tool: "ffmpeg",
            message: stderr.trim().to_string(),
        });
    }

    Ok(())
}
