// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Capacity model.
//!
//! Capacity is a pure function of the symbol profile, never of the payload:
//! encode a fixed probe string, measure the symbol's linear dimension, and
//! take `dimension − 1` (one unit of encoding overhead) as the per-symbol
//! byte budget. The same value is used for every chunk in a run.
//!
//! Because the policy is dimensional rather than derived from the symbol
//! technology's real byte tables, a small profile could nominally promise
//! more than it can encode. A second validation encode of a full-size dummy
//! chunk turns that case into a configuration error at startup instead of a
//! failure halfway through a run.

use crate::symbol::{CapacityProfile, SymbolCodec};
use crate::transport::chunk::CHUNK_HEADER_LEN;
use crate::transport::error::TransportError;

/// Fixed probe input for capacity measurement.
pub const PROBE_DATA: &[u8] = b"Test";

/// Per-symbol byte budget for `profile`: probe dimension − 1.
///
/// # Errors
/// [`TransportError::Symbol`] if the probe encode itself fails (version too
/// small for any content).
pub fn symbol_capacity(
    codec: &dyn SymbolCodec,
    profile: &CapacityProfile,
) -> Result<usize, TransportError> {
    let probe = codec.encode(PROBE_DATA, profile)?;
    Ok((probe.width() as usize).saturating_sub(1))
}

/// Per-chunk body budget: symbol capacity minus the addressed-chunk header,
/// validated against the encoder.
///
/// # Errors
/// - [`TransportError::CapacityTooSmall`] if the symbol budget cannot fit
///   the header plus at least one body byte.
/// - [`TransportError::Symbol`] if a `max_bytes`-sized dummy chunk does not
///   actually encode under `profile`.
pub fn chunk_body_capacity(
    codec: &dyn SymbolCodec,
    profile: &CapacityProfile,
) -> Result<usize, TransportError> {
    let max_bytes = symbol_capacity(codec, profile)?;
    if max_bytes <= CHUNK_HEADER_LEN {
        return Err(TransportError::CapacityTooSmall { max_bytes });
    }

    // Validation encode: the dimensional policy must be honored by the
    // actual encoder before any frame is touched.
    codec.encode(&vec![0u8; max_bytes], profile)?;

    Ok(max_bytes - CHUNK_HEADER_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::qr::QrSymbolCodec;
    use crate::symbol::EcLevel;

    #[test]
    fn capacity_is_dimension_minus_one() {
        let codec = QrSymbolCodec::new();
        let cap = symbol_capacity(&codec, &CapacityProfile::new(5, EcLevel::M)).unwrap();
        // Version 5: 37 modules + 8 quiet-zone modules, minus 1.
        assert_eq!(cap, 44);
    }

    #[test]
    fn capacity_monotonic_in_ec_level() {
        // Raising error correction for a fixed version never increases the
        // byte budget.
        let codec = QrSymbolCodec::new();
        let mut previous = usize::MAX;
        for ec in [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H] {
            let cap = symbol_capacity(&codec, &CapacityProfile::new(10, ec)).unwrap();
            assert!(cap <= previous, "capacity grew when EC strengthened");
            previous = cap;
        }
    }

    #[test]
    fn body_capacity_subtracts_header() {
        let codec = QrSymbolCodec::new();
        let profile = CapacityProfile::new(10, EcLevel::M);
        let symbol = symbol_capacity(&codec, &profile).unwrap();
        let body = chunk_body_capacity(&codec, &profile).unwrap();
        assert_eq!(body, symbol - CHUNK_HEADER_LEN);
    }

    #[test]
    fn tiny_version_fails_validation() {
        // Version 1 at H: 21 + 8 − 1 = 28 nominal bytes, but the symbol can
        // only hold 7. The validation encode must reject the profile.
        let codec = QrSymbolCodec::new();
        let result = chunk_body_capacity(&codec, &CapacityProfile::new(1, EcLevel::H));
        assert!(matches!(result, Err(TransportError::Symbol(_))));
    }
}
