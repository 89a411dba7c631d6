// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! The 2D-symbol codec boundary.
//!
//! The transport layer never talks to a concrete symbol technology. It sees
//! a [`SymbolCodec`]: encode a bounded slice of bytes into a square symbol
//! image, or scan a video frame for a symbol and hand back its bytes. The
//! production backend is QR ([`qr::QrSymbolCodec`]); tests substitute their
//! own codecs to exercise the transport in isolation.

use core::fmt;
use std::str::FromStr;

use crate::video::Frame;

pub mod qr;

/// A rendered symbol: single-channel image, dark modules on light ground.
pub type SymbolImage = image::GrayImage;

/// Error-correction strength of a symbol, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for EcLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" | "l" => Ok(Self::L),
            "M" | "m" => Ok(Self::M),
            "Q" | "q" => Ok(Self::Q),
            "H" | "h" => Ok(Self::H),
            _ => Err(format!("unknown error-correction level: {s}")),
        }
    }
}

/// Size/density tier plus error-correction level. One profile is chosen per
/// run and used for every chunk; capacity is a pure function of the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityProfile {
    /// Symbol version (QR: 1..=40, larger is denser).
    pub version: i16,
    /// Error-correction strength.
    pub ec_level: EcLevel,
}

impl CapacityProfile {
    pub fn new(version: i16, ec_level: EcLevel) -> Self {
        Self { version, ec_level }
    }
}

impl Default for CapacityProfile {
    /// Production default: densest version, medium error correction.
    fn default() -> Self {
        Self { version: 40, ec_level: EcLevel::M }
    }
}

/// Errors from the symbol encoder.
#[derive(Debug)]
pub enum SymbolError {
    /// The data does not fit in a symbol of the requested profile.
    DataTooLarge,
    /// The backend rejected the request for another reason.
    Encode(String),
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataTooLarge => write!(f, "data too large for symbol profile"),
            Self::Encode(msg) => write!(f, "symbol encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for SymbolError {}

/// Capability interface over an opaque 2D-symbol technology.
pub trait SymbolCodec {
    /// Encode `data` into one symbol image under the given profile.
    fn encode(&self, data: &[u8], profile: &CapacityProfile) -> Result<SymbolImage, SymbolError>;

    /// Scan a frame for a symbol. `None` means no decodable symbol — an
    /// expected condition on recompressed video, never an error.
    fn decode(&self, frame: &Frame) -> Option<Vec<u8>>;
}
