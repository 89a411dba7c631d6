// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Error types for video frame I/O and container plumbing.

use core::fmt;
use std::path::PathBuf;

/// Errors from frame I/O, probing, or the external remux step.
#[derive(Debug)]
pub enum VideoError {
    /// A required external tool (ffmpeg/ffprobe) is not on PATH.
    ToolNotFound(&'static str),
    /// An external tool exited non-zero; `message` carries its stderr.
    ToolFailed { tool: &'static str, message: String },
    /// Tool output could not be parsed.
    ProbeParse(String),
    /// The input has no video stream.
    MissingVideoStream(PathBuf),
    /// The frame stream ended mid-frame (partial pixel buffer).
    FrameTruncated,
    /// Underlying I/O error on a pipe or file.
    Io(std::io::Error),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToolNotFound(tool) => write!(f, "{tool} not found on PATH"),
            Self::ToolFailed { tool, message } => write!(f, "{tool} failed: {message}"),
            Self::ProbeParse(msg) => write!(f, "cannot parse probe output: {msg}"),
            Self::MissingVideoStream(path) => {
                write!(f, "no video stream in {}", path.display())
            }
            Self::FrameTruncated => write!(f, "frame stream ended mid-frame"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for VideoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VideoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Map a spawn failure: `NotFound` means the tool is missing, anything else
/// is a plain I/O error.
pub(crate) fn spawn_error(tool: &'static str, e: std::io::Error) -> VideoError {
    if e.kind() == std::io::ErrorKind::NotFound {
        VideoError::ToolNotFound(tool)
    } else {
        VideoError::Io(e)
    }
}

/// Drain a child's stderr on its own thread, concurrently with the parent's
/// stdout/stdin work. A tool that floods stderr past the pipe buffer would
/// otherwise block against our `wait()` and hang the run. Keeps the first
/// 64 KiB for the error message and discards the rest.
pub(crate) fn drain_stderr<R>(stderr: R) -> std::thread::JoinHandle<String>
where
    R: std::io::Read + Send + 'static,
{
    std::thread::spawn(move || {
        use std::io::Read as _;

        let mut message = String::new();
        let mut head = stderr.take(64 * 1024);
        let _ = head.read_to_string(&mut message);
        let _ = std::io::copy(&mut head.into_inner(), &mut std::io::sink());
        message
    })
}
