// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! QR backend for the symbol codec boundary.
//!
//! Encoding uses the `qrcode` crate in byte mode at a fixed version, so
//! every symbol in a run has the same module grid. Symbols are rendered at
//! one pixel per module with the native quiet zone included; the embedder
//! scales them up to frame size, so the quiet zone survives scaling and the
//! scanner always sees a proper margin.
//!
//! Decoding converts the frame to grayscale and runs `rqrr`. Any detection
//! or decode failure maps to `None` -- on recompressed video that is the
//! normal fate of a damaged symbol, not an error.

use image::Luma;
use qrcode::{EcLevel as QrEc, QrCode, Version};

use super::{CapacityProfile, EcLevel, SymbolCodec, SymbolError, SymbolImage};
use crate::video::Frame;

/// Symbol codec backed by QR codes.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrSymbolCodec;

impl QrSymbolCodec {
    pub fn new() -> Self {
        Self
    }
}

fn to_qr_ec(level: EcLevel) -> QrEc {
    match level {
        EcLevel::L => QrEc::L,
        EcLevel::M => QrEc::M,
        EcLevel::Q => QrEc::Q,
        EcLevel::H => QrEc::H,
    }
}

impl SymbolCodec for QrSymbolCodec {
    fn encode(&self, data: &[u8], profile: &CapacityProfile) -> Result<SymbolImage, SymbolError> {
        let code = QrCode::with_version(
            data,
            Version::Normal(profile.version),
            to_qr_ec(profile.ec_level),
        )
        .map_err(|e| match e {
            qrcode::types::QrError::DataTooLong => SymbolError::DataTooLarge,
            other => SymbolError::Encode(other.to_string()),
        })?;

        // One pixel per module; quiet zone on (see module docs).
        Ok(code
            .render::<Luma<u8>>()
            .module_dimensions(1, 1)
            .build())
    }

    fn decode(&self, frame: &Frame) -> Option<Vec<u8>> {
        let gray = image::imageops::grayscale(frame);
        let mut prepared = rqrr::PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();
        for grid in &grids {
            let mut bytes = Vec::new();
            if grid.decode_to(&mut bytes).is_ok() && !bytes.is_empty() {
                return Some(bytes);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_dimension_matches_version_grid() {
        let codec = QrSymbolCodec::new();
        let profile = CapacityProfile::new(5, EcLevel::M);
        let img = codec.encode(b"Test", &profile).unwrap();
        // Version 5 = 37 modules, plus 4-module quiet zone on each side.
        assert_eq!(img.width(), 37 + 8);
        assert_eq!(img.height(), img.width());
    }

    #[test]
    fn dimension_independent_of_ec_level() {
        let codec = QrSymbolCodec::new();
        let low = codec.encode(b"Test", &CapacityProfile::new(10, EcLevel::L)).unwrap();
        let high = codec.encode(b"Test", &CapacityProfile::new(10, EcLevel::H)).unwrap();
        assert_eq!(low.width(), high.width());
    }

    #[test]
    fn oversized_data_rejected() {
        let codec = QrSymbolCodec::new();
        let profile = CapacityProfile::new(1, EcLevel::H);
        let result = codec.encode(&[0u8; 64], &profile);
        assert!(matches!(result, Err(SymbolError::DataTooLarge)));
    }

    #[test]
    fn decode_recovers_encoded_bytes() {
        let codec = QrSymbolCodec::new();
        let profile = CapacityProfile::new(3, EcLevel::M);
        let data = b"phasm-video codec check";
        let symbol = codec.encode(data, &profile).unwrap();

        // Scale up so rqrr has enough pixels per module, then lift into an
        // RGB frame the way the extractor sees it.
        let big = image::imageops::resize(
            &symbol,
            symbol.width() * 8,
            symbol.height() * 8,
            image::imageops::FilterType::Nearest,
        );
        let mut frame = Frame::from_pixel(big.width(), big.height(), image::Rgb([255, 255, 255]));
        for (x, y, px) in big.enumerate_pixels() {
            frame.put_pixel(x, y, image::Rgb([px.0[0], px.0[0], px.0[0]]));
        }

        assert_eq!(codec.decode(&frame).as_deref(), Some(&data[..]));
    }

    #[test]
    fn blank_frame_yields_none() {
        let codec = QrSymbolCodec::new();
        let frame = Frame::from_pixel(64, 64, image::Rgb([128, 128, 128]));
        assert!(codec.decode(&frame).is_none());
    }
}
