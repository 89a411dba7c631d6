// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Embed and extract pipelines.
//!
//! The stream-level entry points ([`embed_stream`], [`extract_stream`])
//! work against the [`FrameSource`]/[`FrameSink`] and [`SymbolCodec`]
//! capabilities and carry the whole protocol. The file-level entry points
//! ([`embed_file`], [`extract_file`]) wire them to ffmpeg-backed frame I/O,
//! a lossless temporary output, and the final remux.
//!
//! Both paths are strictly sequential frame by frame: frame order must be
//! preserved bit-for-bit between embed and extract, so there are no
//! parallel frame workers anywhere.

use std::fs;
use std::path::Path;

use crate::symbol::qr::QrSymbolCodec;
use crate::symbol::SymbolCodec;
use crate::transport::capacity::chunk_body_capacity;
use crate::transport::chunk::{check_frame_budget, plan_chunks, seal_chunk};
use crate::transport::embed::composite_symbol;
use crate::transport::error::TransportError;
use crate::transport::extract::FragmentCollector;
use crate::transport::payload::{decode_payload, encode_payload};
use crate::transport::{progress, EmbedConfig};
use crate::video::{self, FfmpegFrameSink, FfmpegFrameSource, FrameSink, FrameSource};

/// Summary of a completed embed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Carrier frames written (= chunk count).
    pub chunk_count: usize,
    /// Total frames written, carriers plus pass-through.
    pub frame_count: usize,
}

/// Embed `payload` into the frames of `source`, writing every frame (carrier
/// or pass-through) to `sink` in order.
///
/// Fails before writing any frame if the payload needs more carrier frames
/// than the source has, or if the symbol profile cannot carry its nominal
/// capacity.
pub fn embed_stream(
    source: &mut dyn FrameSource,
    sink: &mut dyn FrameSink,
    codec: &dyn SymbolCodec,
    payload: &[u8],
    config: &EmbedConfig,
) -> Result<EmbedReport, TransportError> {
    // 1. Capacity model: one body budget for the whole run.
    let body_capacity = chunk_body_capacity(codec, &config.profile)?;

    // 2. Base64-frame the payload and plan the chunk sequence. An empty
    //    payload still gets one empty-bodied chunk, so extraction can tell
    //    it apart from a video with nothing embedded.
    let encoded = encode_payload(payload);
    let chunks = plan_chunks(&encoded, body_capacity);
    let sealed: Vec<Vec<u8>> = if chunks.is_empty() {
        vec![seal_chunk(0, 1, b"")]
    } else {
        let total = chunks.len() as u32;
        chunks.iter().map(|c| seal_chunk(c.index, total, c.bytes)).collect()
    };
    let frames = source.frame_count();
    check_frame_budget(sealed.len(), frames)?;

    tracing::info!(
        payload_bytes = payload.len(),
        encoded_bytes = encoded.len(),
        body_capacity,
        chunks = sealed.len(),
        frames,
        "embedding payload"
    );
    progress::init(frames as u32);

    // 3. Pre-encode all symbols so nothing is written if any chunk fails.
    let mut symbols = Vec::with_capacity(sealed.len());
    for chunk in &sealed {
        symbols.push(codec.encode(chunk, &config.profile)?);
    }

    // 4. Carrier frames first, then pass-through for the remainder.
    let mut written = 0usize;
    for symbol in &symbols {
        let mut frame = source
            .next_frame()?
            .ok_or(TransportError::SourceExhausted { written, expected: frames })?;
        composite_symbol(&mut frame, symbol, config.opacity);
        sink.write(&frame)?;
        written += 1;
        progress::advance();
    }
    while let Some(frame) = source.next_frame()? {
        sink.write(&frame)?;
        written += 1;
        progress::advance();
    }
    progress::finish();

    Ok(EmbedReport { chunk_count: symbols.len(), frame_count: written })
}

/// Scan every frame of `source` and reconstruct the payload.
///
/// Frames with no decodable symbol are skipped silently; missing chunks are
/// reported by index after the scan.
pub fn extract_stream(
    source: &mut dyn FrameSource,
    codec: &dyn SymbolCodec,
) -> Result<Vec<u8>, TransportError> {
    progress::init(source.frame_count() as u32);

    let mut collector = FragmentCollector::new();
    while let Some(frame) = source.next_frame()? {
        collector.offer(codec.decode(&frame));
        progress::advance();
    }
    progress::finish();

    let stream = collector.into_stream()?;
    decode_payload(&stream)
}

/// Embed the file at `payload_path` into `video_path`, producing `output`:
/// probe, stream frames through ffmpeg into a lossless temporary video,
/// then remux against the original for audio/subtitles/metadata.
pub fn embed_file(
    video_path: &Path,
    payload_path: &Path,
    output: &Path,
    config: &EmbedConfig,
) -> Result<EmbedReport, TransportError> {
    let payload = fs::read(payload_path).map_err(video::VideoError::Io)?;
    let info = video::probe(video_path)?;

    let temp_dir = tempfile::tempdir().map_err(video::VideoError::Io)?;
    let temp_video = temp_dir.path().join("carrier.mkv");

    let codec = QrSymbolCodec::new();
    let report = {
        let mut source = FfmpegFrameSource::open(video_path, &info)?;
        let mut sink =
            FfmpegFrameSink::create(&temp_video, info.width, info.height, &info.frame_rate)?;
        let report = embed_stream(&mut source, &mut sink, &codec, &payload, config)?;
        sink.finish()?;
        report
        // Source and sink drop here; both handles are closed before remux.
    };

    video::remux(video_path, &temp_video, output)?;

    tracing::info!(
        output = %output.display(),
        chunks = report.chunk_count,
        frames = report.frame_count,
        "embed run complete"
    );
    Ok(report)
}

/// Extract the payload hidden in `video_path` and write it to `output`.
pub fn extract_file(video_path: &Path, output: &Path) -> Result<Vec<u8>, TransportError> {
    let info = video::probe(video_path)?;
    let codec = QrSymbolCodec::new();

    let mut source = FfmpegFrameSource::open(video_path, &info)?;
    let payload = extract_stream(&mut source, &codec)?;
    drop(source);

    fs::write(output, &payload).map_err(video::VideoError::Io)?;
    tracing::info!(
        output = %output.display(),
        payload_bytes = payload.len(),
        "extract run complete"
    );
    Ok(payload)
}
