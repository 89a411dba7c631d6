// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! The frame pixel buffer.
//!
//! Frames are packed RGB24, matching the `rawvideo -pix_fmt rgb24` layout
//! that the ffmpeg reader and writer speak over their pipes. `image`'s
//! `RgbImage` already is exactly that buffer, so it is used directly.

/// One video frame: width × height packed RGB24.
pub type Frame = image::RgbImage;

/// Byte length of one raw RGB24 frame.
pub fn raw_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}
