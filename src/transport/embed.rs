// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Frame embedder: commits one symbol to one carrier frame.
//!
//! The symbol is scaled so its longer side matches the frame's shorter side
//! (Lanczos3, aspect preserved -- symbols are square, so it never exceeds
//! frame bounds), blended at the configured opacity, and centered both
//! horizontally and vertically. Pass-through frames are not routed through
//! here at all; the pipeline copies them untouched.

use image::imageops::FilterType;

use crate::symbol::SymbolImage;
use crate::video::Frame;

/// Composite `symbol` onto `frame` in place, centered, at `opacity`
/// (`0.0` = invisible, `1.0` = fully opaque).
pub fn composite_symbol(frame: &mut Frame, symbol: &SymbolImage, opacity: f32) {
    let target = frame.width().min(frame.height());
    let scaled = image::imageops::resize(symbol, target, target, FilterType::Lanczos3);

    let x0 = (frame.width() - target) / 2;
    let y0 = (frame.height() - target) / 2;
    let alpha = opacity.clamp(0.0, 1.0);

    for (sx, sy, px) in scaled.enumerate_pixels() {
        let luma = px.0[0] as f32;
        let dst = frame.get_pixel_mut(x0 + sx, y0 + sy);
        for channel in dst.0.iter_mut() {
            let base = *channel as f32;
            *channel = (base + (luma - base) * alpha).round() as u8;
        }
    }
}
