// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Frame extractor: fragment collection and reassembly.
//!
//! Every frame is offered to the symbol codec. Frames with no decodable
//! symbol contribute nothing -- on recompressed video that is routine, so
//! misses are skipped silently and only counted. Decoded fragments are
//! CRC-verified, deduplicated by sequence number, and reassembled in index
//! order. The `total` field in each header lets reassembly name exactly
//! which chunks are missing, including trailing ones.

use std::collections::BTreeMap;

use crate::transport::chunk::{open_chunk, Fragment};
use crate::transport::error::TransportError;

/// Accumulates recovered fragments during a frame scan.
#[derive(Debug, Default)]
pub struct FragmentCollector {
    fragments: BTreeMap<u32, Fragment>,
    frames_scanned: usize,
    symbols_decoded: usize,
    dropped: usize,
}

impl FragmentCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame's scan result. `None` means the codec found no
    /// symbol; corrupt fragments (bad CRC, truncated) are dropped the same
    /// way. Duplicate sequence numbers keep the first occurrence.
    pub fn offer(&mut self, decoded: Option<Vec<u8>>) {
        self.frames_scanned += 1;
        let Some(bytes) = decoded else { return };
        self.symbols_decoded += 1;

        match open_chunk(&bytes) {
            Some(fragment) => {
                self.fragments.entry(fragment.index).or_insert(fragment);
            }
            None => {
                self.dropped += 1;
                tracing::debug!(
                    frame = self.frames_scanned - 1,
                    "dropping fragment with bad header or CRC"
                );
            }
        }
    }

    /// Frames scanned so far.
    pub fn frames_scanned(&self) -> usize {
        self.frames_scanned
    }

    /// Fragments currently held.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Finish the scan: verify completeness and concatenate the bodies in
    /// index order.
    ///
    /// # Errors
    /// - [`TransportError::NoSymbolsFound`] if nothing usable was decoded.
    /// - [`TransportError::TotalMismatch`] if surviving fragments disagree
    ///   on the total chunk count, or claim one larger than the number of
    ///   frames scanned.
    /// - [`TransportError::MissingChunks`] naming every absent index.
    pub fn into_stream(self) -> Result<Vec<u8>, TransportError> {
        if self.fragments.is_empty() {
            return Err(TransportError::NoSymbolsFound);
        }

        let total = self.fragments.values().next().map(|f| f.total).unwrap_or(0);
        if self.fragments.values().any(|f| f.total != total) {
            return Err(TransportError::TotalMismatch);
        }
        // A garbage decode that collides the CRC could claim an absurd
        // total; no valid run has more chunks than scanned frames, so
        // reject it before building a missing-index list of that size.
        if total as usize > self.frames_scanned {
            return Err(TransportError::TotalMismatch);
        }

        let missing: Vec<u32> = (0..total)
            .filter(|i| !self.fragments.contains_key(i))
            .collect();
        if !missing.is_empty() {
            return Err(TransportError::MissingChunks { missing, total });
        }

        tracing::info!(
            frames = self.frames_scanned,
            symbols = self.symbols_decoded,
            dropped = self.dropped,
            chunks = total,
            "reassembled recovered stream"
        );

        let mut stream = Vec::new();
        for fragment in self.fragments.into_values() {
            stream.extend_from_slice(&fragment.body);
        }
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::chunk::seal_chunk;

    #[test]
    fn reassembles_in_order_despite_arrival_order() {
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(2, 3, b"C")));
        collector.offer(Some(seal_chunk(0, 3, b"A")));
        collector.offer(Some(seal_chunk(1, 3, b"B")));
        assert_eq!(collector.into_stream().unwrap(), b"ABC");
    }

    #[test]
    fn misses_are_skipped_silently() {
        let mut collector = FragmentCollector::new();
        collector.offer(None);
        collector.offer(Some(seal_chunk(0, 1, b"only")));
        collector.offer(None);
        assert_eq!(collector.frames_scanned(), 3);
        assert_eq!(collector.into_stream().unwrap(), b"only");
    }

    #[test]
    fn missing_chunk_is_reported() {
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(0, 3, b"A")));
        collector.offer(None); // chunk 1 destroyed in transit
        collector.offer(Some(seal_chunk(2, 3, b"C")));
        match collector.into_stream() {
            Err(TransportError::MissingChunks { missing, total }) => {
                assert_eq!(missing, vec![1]);
                assert_eq!(total, 3);
            }
            other => panic!("expected MissingChunks, got {other:?}"),
        }
    }

    #[test]
    fn trailing_truncation_is_detected() {
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(0, 4, b"A")));
        collector.offer(Some(seal_chunk(1, 4, b"B")));
        match collector.into_stream() {
            Err(TransportError::MissingChunks { missing, .. }) => {
                assert_eq!(missing, vec![2, 3]);
            }
            other => panic!("expected MissingChunks, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_fragment_dropped_like_a_miss() {
        let mut sealed = seal_chunk(0, 1, b"body");
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;

        let mut collector = FragmentCollector::new();
        collector.offer(Some(sealed));
        assert_eq!(collector.fragment_count(), 0);
        assert!(matches!(
            collector.into_stream(),
            Err(TransportError::NoSymbolsFound)
        ));
    }

    #[test]
    fn duplicate_index_keeps_first() {
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(0, 1, b"first")));
        collector.offer(Some(seal_chunk(0, 1, b"second")));
        assert_eq!(collector.into_stream().unwrap(), b"first");
    }

    #[test]
    fn absurd_total_rejected() {
        // One frame scanned, but the fragment claims u32::MAX chunks.
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(0, u32::MAX, b"x")));
        assert!(matches!(
            collector.into_stream(),
            Err(TransportError::TotalMismatch)
        ));
    }

    #[test]
    fn total_disagreement_is_an_error() {
        let mut collector = FragmentCollector::new();
        collector.offer(Some(seal_chunk(0, 2, b"A")));
        collector.offer(Some(seal_chunk(1, 3, b"B")));
        assert!(matches!(
            collector.into_stream(),
            Err(TransportError::TotalMismatch)
        ));
    }

    #[test]
    fn empty_scan_fails() {
        let mut collector = FragmentCollector::new();
        collector.offer(None);
        assert!(matches!(
            collector.into_stream(),
            Err(TransportError::NoSymbolsFound)
        ));
    }
}
