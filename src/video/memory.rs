// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Vector-backed frame source and sink.
//!
//! Same contracts as the ffmpeg-backed implementations, minus the child
//! processes. Used by the test suite and by callers that already hold
//! decoded frames in memory.

use super::error::VideoError;
use super::frame::Frame;
use super::{FrameSink, FrameSource};

/// Frame source over a pre-built frame vector.
pub struct MemorySource {
    frames: std::vec::IntoIter<Frame>,
    width: u32,
    height: u32,
    count: usize,
}

impl MemorySource {
    /// Build a source from uniformly sized frames.
    ///
    /// # Panics
    /// Panics if `frames` is empty or the frames disagree on geometry.
    pub fn new(frames: Vec<Frame>) -> Self {
        let first = frames.first().expect("memory source needs at least one frame");
        let (width, height) = (first.width(), first.height());
        assert!(
            frames.iter().all(|f| f.width() == width && f.height() == height),
            "all frames must share one geometry"
        );
        let count = frames.len();
        Self { frames: frames.into_iter(), width, height, count }
    }
}

impl FrameSource for MemorySource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame_count(&self) -> usize {
        self.count
    }

    fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        Ok(self.frames.next())
    }
}

/// Frame sink that collects frames into a vector.
#[derive(Default)]
pub struct MemorySink {
    frames: Vec<Frame>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written so far, in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Whether `finish` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the sink, returning the collected frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSink for MemorySink {
    fn write(&mut self, frame: &Frame) -> Result<(), VideoError> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), VideoError> {
        self.finished = true;
        Ok(())
    }
}
