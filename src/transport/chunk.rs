// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Chunk planning and the addressed-chunk wire format.
//!
//! The planner slices the base64 stream greedily left to right into
//! fixed-size chunks; only the last may be shorter. Before symbol encoding
//! each chunk is sealed with a small header:
//!
//! ```text
//! [4 bytes] sequence number (big-endian u32)
//! [4 bytes] total chunk count (big-endian u32)
//! [4 bytes] CRC-32 over seq ‖ total ‖ body
//! [N bytes] body (slice of the base64 stream)
//! ```
//!
//! The header is what lets the extractor reorder fragments, drop corrupt
//! ones, and know that a chunk is missing -- including trailing chunks,
//! which a bare frame-order scheme could never detect.

use crate::transport::error::TransportError;

/// Sealed-chunk header length: seq(4) + total(4) + crc(4).
pub const CHUNK_HEADER_LEN: usize = 4 + 4 + 4;

/// One planned chunk: a borrowed slice of the encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 0-based, contiguous index.
    pub index: u32,
    /// Body bytes, `len <= body_capacity`.
    pub bytes: &'a [u8],
}

/// Number of chunks an `encoded_len`-byte stream needs at `body_capacity`
/// bytes per chunk.
pub fn chunk_count(encoded_len: usize, body_capacity: usize) -> usize {
    encoded_len.div_ceil(body_capacity)
}

/// Slice `encoded` into the ordered chunk sequence. Deterministic: the same
/// stream and capacity always produce the same boundaries.
pub fn plan_chunks(encoded: &[u8], body_capacity: usize) -> Vec<Chunk<'_>> {
    assert!(body_capacity > 0, "body capacity must be positive");
    encoded
        .chunks(body_capacity)
        .enumerate()
        .map(|(i, bytes)| Chunk { index: i as u32, bytes })
        .collect()
}

/// Seal a chunk body with its header, ready for symbol encoding.
pub fn seal_chunk(index: u32, total: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(CHUNK_HEADER_LEN + body.len());
    out.extend_from_slice(&index.to_be_bytes());
    out.extend_from_slice(&total.to_be_bytes());
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&index.to_be_bytes());
    hasher.update(&total.to_be_bytes());
    hasher.update(body);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// A fragment recovered from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub index: u32,
    pub total: u32,
    pub body: Vec<u8>,
}

/// Parse and verify a sealed chunk. `None` on truncation or CRC mismatch —
/// the caller drops such fragments exactly like undecodable symbols.
pub fn open_chunk(data: &[u8]) -> Option<Fragment> {
    if data.len() < CHUNK_HEADER_LEN {
        return None;
    }
    let index = u32::from_be_bytes(data[0..4].try_into().ok()?);
    let total = u32::from_be_bytes(data[4..8].try_into().ok()?);
    let stored_crc = u32::from_be_bytes(data[8..12].try_into().ok()?);
    let body = &data[CHUNK_HEADER_LEN..];

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&data[0..8]);
    hasher.update(body);
    if hasher.finalize() != stored_crc {
        return None;
    }
    if index >= total {
        return None;
    }

    Some(Fragment { index, total, body: body.to_vec() })
}

/// Fail-fast check: the chunk sequence must fit the video.
pub fn check_frame_budget(chunks: usize, frames: usize) -> Result<(), TransportError> {
    if chunks > frames {
        return Err(TransportError::CapacityExceeded { chunks, frames });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_formula() {
        assert_eq!(chunk_count(50, 20), 3);
        assert_eq!(chunk_count(40, 20), 2);
        assert_eq!(chunk_count(41, 20), 3);
        assert_eq!(chunk_count(0, 20), 0);
        assert_eq!(chunk_count(1, 1), 1);
    }

    #[test]
    fn fifty_bytes_at_twenty_per_chunk() {
        // Reference scenario: boundaries [0:20), [20:40), [40:50).
        let data: Vec<u8> = (0..50).collect();
        let chunks = plan_chunks(&data, 20);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].bytes, &data[0..20]);
        assert_eq!(chunks[1].bytes, &data[20..40]);
        assert_eq!(chunks[2].bytes, &data[40..50]);
        assert_eq!(chunks[2].bytes.len(), 10);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i as u32);
        }
    }

    #[test]
    fn planning_is_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(plan_chunks(&data, 37), plan_chunks(&data, 37));
    }

    #[test]
    fn full_coverage_no_overlap() {
        let data: Vec<u8> = (0..113).map(|i| (i * 7) as u8).collect();
        let chunks = plan_chunks(&data, 16);
        let rejoined: Vec<u8> = chunks.iter().flat_map(|c| c.bytes.iter().copied()).collect();
        assert_eq!(rejoined, data);
    }

    #[test]
    fn seal_open_roundtrip() {
        let sealed = seal_chunk(2, 7, b"some chunk body");
        assert_eq!(sealed.len(), CHUNK_HEADER_LEN + 15);
        let frag = open_chunk(&sealed).unwrap();
        assert_eq!(frag.index, 2);
        assert_eq!(frag.total, 7);
        assert_eq!(frag.body, b"some chunk body");
    }

    #[test]
    fn corrupted_body_fails_crc() {
        let mut sealed = seal_chunk(0, 1, b"payload");
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(open_chunk(&sealed).is_none());
    }

    #[test]
    fn corrupted_header_fails_crc() {
        let mut sealed = seal_chunk(3, 9, b"payload");
        sealed[0] ^= 0x80; // flip a seq bit
        assert!(open_chunk(&sealed).is_none());
    }

    #[test]
    fn truncated_fragment_rejected() {
        assert!(open_chunk(&[]).is_none());
        assert!(open_chunk(&[0u8; CHUNK_HEADER_LEN - 1]).is_none());
    }

    #[test]
    fn index_beyond_total_rejected() {
        // Build a structurally valid fragment with index >= total.
        let mut bad = Vec::new();
        bad.extend_from_slice(&5u32.to_be_bytes());
        bad.extend_from_slice(&3u32.to_be_bytes());
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&bad[0..8]);
        hasher.update(b"x");
        bad.extend_from_slice(&hasher.finalize().to_be_bytes());
        bad.extend_from_slice(b"x");
        assert!(open_chunk(&bad).is_none());
    }

    #[test]
    fn budget_check() {
        assert!(check_frame_budget(3, 3).is_ok());
        assert!(check_frame_budget(0, 0).is_ok());
        match check_frame_budget(3, 2) {
            Err(TransportError::CapacityExceeded { chunks: 3, frames: 2 }) => {}
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }
}
