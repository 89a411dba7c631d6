// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Error types for the transport pipeline.
//!
//! [`TransportError`] covers all fatal failure modes from capacity probing
//! through final payload reconstruction. Per-frame decode misses are not
//! errors; they surface only if reassembly ends up with missing chunks.

use core::fmt;

use crate::symbol::SymbolError;
use crate::video::VideoError;

/// Errors that abort an embed or extract run.
#[derive(Debug)]
pub enum TransportError {
    /// Frame I/O, probing, or remux failed.
    Video(VideoError),
    /// The symbol encoder rejected a probe or chunk (fatal configuration
    /// error -- the profile cannot carry its nominal capacity).
    Symbol(SymbolError),
    /// The profile's symbol capacity cannot fit even the chunk header.
    CapacityTooSmall { max_bytes: usize },
    /// The payload needs more carrier frames than the video has.
    CapacityExceeded { chunks: usize, frames: usize },
    /// The frame source ended before all chunks were embedded.
    SourceExhausted { written: usize, expected: usize },
    /// Extraction found no symbol in any frame.
    NoSymbolsFound,
    /// Reassembly is missing chunks (destroyed or undecodable symbols).
    MissingChunks { missing: Vec<u32>, total: u32 },
    /// Surviving fragments disagree on the total chunk count, or claim one
    /// larger than the scanned frame count.
    TotalMismatch,
    /// The reassembled stream is not valid base64 -- corrupted recovery.
    Base64(base64::DecodeError),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video(e) => write!(f, "video I/O: {e}"),
            Self::Symbol(e) => write!(f, "symbol codec: {e}"),
            Self::CapacityTooSmall { max_bytes } => {
                write!(f, "symbol capacity {max_bytes} too small for chunk header")
            }
            Self::CapacityExceeded { chunks, frames } => write!(
                f,
                "payload needs {chunks} carrier frames but the video has only {frames}"
            ),
            Self::SourceExhausted { written, expected } => write!(
                f,
                "frame source ended after {written} of {expected} promised frames"
            ),
            Self::NoSymbolsFound => write!(f, "no symbols found in any frame"),
            Self::MissingChunks { missing, total } => write!(
                f,
                "recovered {} of {total} chunks; missing indices: {:?}",
                *total as usize - missing.len(),
                missing
            ),
            Self::TotalMismatch => {
                write!(f, "recovered fragments carry an inconsistent total chunk count")
            }
            Self::Base64(e) => write!(f, "recovered stream is not valid base64: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Video(e) => Some(e),
            Self::Symbol(e) => Some(e),
            Self::Base64(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VideoError> for TransportError {
    fn from(e: VideoError) -> Self {
        Self::Video(e)
    }
}

impl From<SymbolError> for TransportError {
    fn from(e: SymbolError) -> Self {
        Self::Symbol(e)
    }
}

impl From<base64::DecodeError> for TransportError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Base64(e)
    }
}
