// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmvideo

//! Payload codec: base64 framing of the raw payload.
//!
//! Standard alphabet, padded, no line wrapping. Encoding happens once per
//! run before chunking; decoding once at the end of extraction over the
//! reassembled stream. A decode failure means the recovery is corrupted —
//! the caller surfaces it, no partial recovery is attempted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::transport::error::TransportError;

/// Encode the raw payload into the base64 stream that gets chunked.
pub fn encode_payload(payload: &[u8]) -> Vec<u8> {
    STANDARD.encode(payload).into_bytes()
}

/// Decode the reassembled base64 stream back into payload bytes.
///
/// # Errors
/// [`TransportError::Base64`] if the stream is not valid base64.
pub fn decode_payload(encoded: &[u8]) -> Result<Vec<u8>, TransportError> {
    Ok(STANDARD.decode(encoded)?)
}
