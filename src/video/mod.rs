// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Sequential video frame I/O and container plumbing.
//!
//! Frames move through the system strictly in order -- frame index is part of
//! the transport addressing, so there is no seeking, no parallel readers and
//! no reordering anywhere in this module. The production implementations
//! shell out to ffmpeg/ffprobe over pipes ([`reader`], [`writer`],
//! [`probe`], [`remux`]); [`memory`] provides vector-backed equivalents for
//! tests and in-process callers.

pub mod error;
pub mod frame;
pub mod memory;
pub mod probe;
pub mod reader;
pub mod remux;
pub mod writer;

pub use error::VideoError;
pub use frame::Frame;
pub use memory::{MemorySink, MemorySource};
pub use probe::{probe, VideoInfo};
pub use reader::FfmpegFrameSource;
pub use remux::remux;
pub use writer::FfmpegFrameSink;

/// Ordered, read-once source of video frames.
pub trait FrameSource {
    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;

    /// Total number of frames this source will yield.
    fn frame_count(&self) -> usize;

    /// Read the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;
}

/// Ordered sink for video frames.
pub trait FrameSink {
    /// Append one frame. Frames must arrive in presentation order.
    fn write(&mut self, frame: &Frame) -> Result<(), VideoError>;

    /// Flush and close the sink. Must be called on every success path
    /// before any consumer (e.g. remux) touches the written output.
    fn finish(&mut self) -> Result<(), VideoError>;
}
