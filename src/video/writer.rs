// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Sequential frame writing over an ffmpeg pipe.
//!
//! Frames stream into ffmpeg's stdin as packed RGB24 and come out as a
//! losslessly coded (FFV1) video-only Matroska file. Lossless coding keeps
//! pass-through frames bit-identical to the source and leaves the embedded
//! symbols untouched; any lossy generation is the downstream transport's
//! problem, not ours.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use super::error::{drain_stderr, spawn_error, VideoError};
use super::frame::Frame;
use super::FrameSink;

/// Frame sink backed by an `ffmpeg` child process encoding FFV1/MKV.
pub struct FfmpegFrameSink {
    child: Child,
    stdin: Option<BufWriter<ChildStdin>>,
    stderr: Option<JoinHandle<String>>,
    finished: bool,
}

impl FfmpegFrameSink {
    /// Create `path` (overwritten if present) expecting frames of the given
    /// geometry at `frame_rate` (ffprobe rational form, e.g. `"25/1"`).
    pub fn create(
        path: &Path,
        width: u32,
        height: u32,
        frame_rate: &str,
    ) -> Result<Self, VideoError> {
        let size = format!("{width}x{height}");
        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-y")
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &size])
            .args(["-r", frame_rate])
            .args(["-i", "pipe:0"])
            .args(["-c:v", "ffv1"])
            .args(["-f", "matroska"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let stdin = child.stdin.take().ok_or(VideoError::FrameTruncated)?;
        // Drained on its own thread; a chatty encoder must never fill the
        // stderr pipe while we block on frame writes or `wait()`.
        let stderr = child.stderr.take().map(drain_stderr);
        tracing::debug!(path = %path.display(), %size, frame_rate, "opened ffmpeg frame sink");

        Ok(Self {
            child,
            stdin: Some(BufWriter::new(stdin)),
            stderr,
            finished: false,
        })
    }
}

impl FrameSink for FfmpegFrameSink {
    fn write(&mut self, frame: &Frame) -> Result<(), VideoError> {
        let stdin = self.stdin.as_mut().ok_or(VideoError::FrameTruncated)?;
        stdin.write_all(frame.as_raw())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        // Closing stdin signals end-of-stream; the encoder then finalizes
        // the container.
        if let Some(mut stdin) = self.stdin.take() {
            stdin.flush()?;
        }

        let status = self.child.wait()?;
        let message = self
            .stderr
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        if !status.success() {
            return Err(VideoError::ToolFailed {
                tool: "ffmpeg",
                message: message.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Drop for FfmpegFrameSink {
    fn drop(&mut self) {
        if !self.finished {
            drop(self.stdin.take());
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        if let Some(handle) = self.stderr.take() {
            let _ = handle.join();
        }
    }
}
