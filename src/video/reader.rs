// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Sequential frame reading over an ffmpeg pipe.
//!
//! ffmpeg decodes the input and streams packed RGB24 frames to stdout; the
//! source reads exactly `width * height * 3` bytes per frame. No seeking —
//! the transport protocol consumes frames strictly in order.

use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use super::error::{drain_stderr, spawn_error, VideoError};
use super::frame::{raw_len, Frame};
use super::probe::VideoInfo;
use super::FrameSource;

/// Frame source backed by an `ffmpeg` child process.
pub struct FfmpegFrameSource {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr: Option<JoinHandle<String>>,
    info: VideoInfo,
    exhausted: bool,
}

impl FfmpegFrameSource {
    /// Open `path` for sequential decoding. `info` comes from
    /// [`probe`](super::probe::probe) on the same file.
    pub fn open(path: &Path, info: &VideoInfo) -> Result<Self, VideoError> {
        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error("ffmpeg", e))?;

        let stdout = child.stdout.take().ok_or(VideoError::FrameTruncated)?;
        // Drained on its own thread; a chatty decoder must never fill the
        // stderr pipe while we block on frame reads or `wait()`.
        let stderr = child.stderr.take().map(drain_stderr);
        tracing::debug!(path = %path.display(), "opened ffmpeg frame source");

        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            stderr,
            info: info.clone(),
            exhausted: false,
        })
    }

    /// Reap the child after the stream ends, surfacing decode failures.
    fn reap(&mut self) -> Result<(), VideoError> {
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

impl FrameSource for FfmpegFrameSource {
    fn width(&self) -> u32 {
        self.info.width
    }

    fn height(&self) -> u32 {
        self.info.height
    }

    fn frame_count(&self) -> usize {
        self.info.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut buf = vec![0u8; raw_len(self.info.width, self.info.height)];
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.exhausted = true;
                    self.reap()?;
                    if filled == 0 {
                        return Ok(None);
                    }
                    return Err(VideoError::FrameTruncated);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(VideoError::Io(e)),
            }
        }

        let frame = Frame::from_raw(self.info.width, self.info.height, buf)
            .ok_or(VideoError::FrameTruncated)?;
        Ok(Some(frame))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        // Abandoned mid-stream (error path): kill the decoder so the remux
        // step never races an open handle on the input.
        if !self.exhausted {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
        if let Some(handle) = self.stderr.take() {
            let _ = handle.join();
        }
    }
}
