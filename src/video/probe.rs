// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! ffprobe-based stream probing.
//!
//! The transport needs three facts before a run: frame dimensions, the
//! exact frame count (the fail-fast capacity check depends on it), and the
//! frame rate to carry over to the generated stream. `-count_frames` makes
//! ffprobe decode the stream and report a real count rather than trusting
//! container metadata, which lies often enough to matter here.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::error::{spawn_error, VideoError};

/// Probed facts about the first video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    /// Frame rate as ffprobe reports it (e.g. `"30000/1001"`), passed
    /// verbatim to the ffmpeg writer.
    pub frame_rate: String,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    // ffprobe emits numbers as JSON strings.
    nb_read_frames: Option<String>,
}

/// Probe the first video stream of `path`.
pub fn probe(path: &Path) -> Result<VideoInfo, VideoError> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_frames",
            "-show_entries",
            "stream=width,height,r_frame_rate,nb_read_frames",
            "-print_format",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| spawn_error("ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VideoError::ToolFailed {
            tool: "ffprobe",
            message: stderr.trim().to_string(),
        });
    }

    let json = String::from_utf8_lossy(&output.stdout);
    let info = parse_probe_output(&json)?
        .ok_or_else(|| VideoError::MissingVideoStream(path.to_path_buf()))?;

    tracing::debug!(
        width = info.width,
        height = info.height,
        frames = info.frame_count,
        rate = %info.frame_rate,
        "probed video stream"
    );
    Ok(info)
}

/// Parse ffprobe JSON into [`VideoInfo`]. `Ok(None)` if no usable video
/// stream is present; `Err` if the output is not the JSON we asked for.
fn parse_probe_output(json: &str) -> Result<Option<VideoInfo>, VideoError> {
    let parsed: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| VideoError::ProbeParse(e.to_string()))?;

    let Some(stream) = parsed.streams.into_iter().next() else {
        return Ok(None);
    };
    let (Some(width), Some(height), Some(frames)) =
        (stream.width, stream.height, stream.nb_read_frames)
    else {
        return Ok(None);
    };
    let frame_count = frames
        .parse()
        .map_err(|_| VideoError::ProbeParse(format!("bad frame count: {frames}")))?;
    let frame_rate = stream.r_frame_rate.unwrap_or_else(|| "25/1".to_string());

    Ok(Some(VideoInfo { width, height, frame_count, frame_rate }))
}
