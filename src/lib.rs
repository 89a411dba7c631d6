// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! # phasm-video
//!
//! Pure-Rust transport engine for hiding binary payloads in video files.
//! The payload is base64-framed, sliced into addressed chunks, and each
//! chunk is committed to exactly one video frame as a translucent QR
//! symbol. Extraction scans the frames back out, reassembles the chunks by
//! sequence number, and reports gaps instead of silently truncating.
//!
//! The crate is split into three layers:
//!
//! - `symbol`: the opaque 2D-symbol codec boundary (`SymbolCodec` trait)
//!   with a QR backend (`qrcode` for encoding, `rqrr` for decoding).
//! - `video`: sequential frame I/O over ffmpeg pipes, ffprobe metadata,
//!   and the final stream-mapping remux against the original container.
//! - `transport`: the chunking/embedding/extraction protocol itself.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use phasm_video::{embed_file, extract_file, EmbedConfig};
//!
//! embed_file("cover.mp4".as_ref(), "secret.bin".as_ref(), "out.mkv".as_ref(),
//!     &EmbedConfig::default())?;
//! let payload = extract_file("out.mkv".as_ref(), "recovered.bin".as_ref())?;
//! ```

pub mod symbol;
pub mod transport;
pub mod video;

pub use symbol::qr::QrSymbolCodec;
pub use symbol::{CapacityProfile, EcLevel, SymbolCodec, SymbolError, SymbolImage};
pub use transport::pipeline::{embed_file, embed_stream, extract_file, extract_stream};
pub use transport::{EmbedConfig, EmbedReport, TransportError};
pub use video::{Frame, FrameSink, FrameSource, VideoError};
