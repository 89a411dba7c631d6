// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! End-to-end embed/extract tests over in-memory frames.
//!
//! These run the real QR codec through the real compositing path at full
//! opacity, so the whole transport -- capacity probe, chunk planning,
//! symbol encode, scale/blend, scan, reassembly, base64 decode -- is
//! exercised without touching ffmpeg.

use image::Rgb;
use phasm_video::transport::pipeline::{embed_stream, extract_stream};
use phasm_video::video::{MemorySink, MemorySource};
use phasm_video::{
    CapacityProfile, EcLevel, EmbedConfig, Frame, QrSymbolCodec, TransportError,
};

/// Uniform light-gray frames; enough contrast for a full-opacity symbol.
fn cover_frames(count: usize, width: u32, height: u32) -> Vec<Frame> {
    (0..count)
        .map(|_| Frame::from_pixel(width, height, Rgb([230, 230, 230])))
        .collect()
}

fn test_config() -> EmbedConfig {
    EmbedConfig {
        // Version 5 keeps symbols small enough to scan comfortably after
        // scaling to a 360px frame side.
        profile: CapacityProfile::new(5, EcLevel::M),
        opacity: 1.0,
    }
}

fn embed_into_memory(payload: &[u8], frames: Vec<Frame>, config: &EmbedConfig) -> Vec<Frame> {
    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(frames);
    let mut sink = MemorySink::new();
    embed_stream(&mut source, &mut sink, &codec, payload, config).unwrap();
    sink.into_frames()
}

#[test]
fn roundtrip_recovers_payload() {
    let payload: Vec<u8> = (0u16..80).map(|i| (i * 3 % 251) as u8).collect();
    let frames = embed_into_memory(&payload, cover_frames(8, 360, 360), &test_config());

    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(frames);
    let recovered = extract_stream(&mut source, &codec).unwrap();
    assert_eq!(recovered, payload);
}

#[test]
fn roundtrip_on_landscape_frames() {
    let payload = b"payload on non-square frames".to_vec();
    let frames = embed_into_memory(&payload, cover_frames(6, 640, 360), &test_config());

    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(frames);
    assert_eq!(extract_stream(&mut source, &codec).unwrap(), payload);
}

#[test]
fn pass_through_frames_bit_identical() {
    // Small payload: one chunk, so frames 1..N must come through untouched.
    let covers = cover_frames(5, 360, 360);
    let originals = covers.clone();
    let frames = embed_into_memory(b"tiny", covers, &test_config());

    assert_eq!(frames.len(), 5);
    for i in 1..5 {
        assert_eq!(frames[i], originals[i], "pass-through frame {i} modified");
    }
    assert_ne!(frames[0], originals[0], "carrier frame left unmodified");
}

#[test]
fn overflow_fails_before_any_frame_is_written() {
    // ~100 payload bytes → 136 base64 bytes → several chunks at version 5,
    // but only 2 frames available.
    let payload = vec![0x5Au8; 100];
    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(cover_frames(2, 360, 360));
    let mut sink = MemorySink::new();

    let result = embed_stream(&mut source, &mut sink, &codec, &payload, &test_config());
    match result {
        Err(TransportError::CapacityExceeded { chunks, frames }) => {
            assert!(chunks > 2);
            assert_eq!(frames, 2);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    assert!(sink.frames().is_empty(), "no output frame may exist after a capacity error");
}

#[test]
fn destroyed_carrier_frame_reports_missing_chunk() {
    // Payload large enough for at least 3 chunks.
    let payload: Vec<u8> = (0u16..90).map(|i| i as u8).collect();
    let mut frames = embed_into_memory(&payload, cover_frames(6, 360, 360), &test_config());

    // Simulate recompression destroying the second carrier symbol.
    frames[1] = Frame::from_pixel(360, 360, Rgb([230, 230, 230]));

    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(frames);
    match extract_stream(&mut source, &codec) {
        Err(TransportError::MissingChunks { missing, total }) => {
            assert!(missing.contains(&1), "lost chunk index not reported: {missing:?}");
            assert!(total >= 3);
        }
        other => panic!("expected MissingChunks, got {other:?}"),
    }
}

#[test]
fn video_with_no_symbols_fails_extraction() {
    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(cover_frames(4, 360, 360));
    assert!(matches!(
        extract_stream(&mut source, &codec),
        Err(TransportError::NoSymbolsFound)
    ));
}

#[test]
fn empty_payload_roundtrip() {
    // An empty payload still occupies one carrier frame (empty-bodied
    // chunk), so extraction recovers zero bytes instead of failing.
    let covers = cover_frames(3, 360, 360);
    let originals = covers.clone();
    let frames = embed_into_memory(b"", covers, &test_config());
    assert_ne!(frames[0], originals[0], "carrier frame left unmodified");
    for i in 1..3 {
        assert_eq!(frames[i], originals[i], "pass-through frame {i} modified");
    }

    let codec = QrSymbolCodec::new();
    let mut source = MemorySource::new(frames);
    assert_eq!(extract_stream(&mut source, &codec).unwrap(), Vec::<u8>::new());
}
