// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! The chunking/embedding/extraction transport protocol.
//!
//! Embed path: payload bytes → base64 ([`payload`]) → addressed chunks
//! ([`chunk`], capacity from [`capacity`]) → one symbol per carrier frame
//! ([`embed`], orchestrated by [`pipeline`]). Extract path: frames →
//! decoded fragments → reassembly with gap detection ([`extract`]) →
//! base64 decode → payload bytes.
//!
//! Every chunk carries a sequence number, the total chunk count and a
//! CRC-32, so the extractor can reorder fragments, drop corrupt ones, and
//! name exactly which chunks a damaged video lost — a lost chunk is a
//! reported error, never a silent truncation.

pub mod capacity;
pub mod chunk;
pub mod embed;
pub mod error;
pub mod extract;
pub mod payload;
pub mod pipeline;
pub mod progress;

pub use error::TransportError;
pub use pipeline::EmbedReport;

use crate::symbol::CapacityProfile;

/// Default symbol opacity: ~12.5% of full alpha. A deliberate trade-off
/// between human visibility and machine decodability.
pub const DEFAULT_OPACITY: f32 = 0.125;

/// Per-run embedding configuration, passed explicitly to the pipeline.
/// There is no ambient run-wide state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbedConfig {
    /// Symbol profile used for every chunk in the run.
    pub profile: CapacityProfile,
    /// Blend factor for the composited symbol, in `0.0..=1.0`.
    pub opacity: f32,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            profile: CapacityProfile::default(),
            opacity: DEFAULT_OPACITY,
        }
    }
}
