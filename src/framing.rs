//! URL-safe payload framing: optional zlib compression layered on top of
//! base64url, used by [`crate::URLSafeSerializer`] and
//! [`crate::URLSafeTimedSerializer`].

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::base64;
use crate::error::{BadPayload, PayloadDecodeError};

/// Compresses `bytes` and base64url-encodes the result, but only if doing
/// so actually saves space; otherwise the bytes are encoded as-is. A
/// leading `.` marks the compressed form so [`decode_urlsafe`] knows
/// whether to inflate before decoding.
pub(crate) fn encode_urlsafe(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .expect("writing to an in-memory buffer cannot fail");
    let compressed = encoder
        .finish()
        .expect("finishing an in-memory buffer cannot fail");

    if compressed.len() < bytes.len().saturating_sub(1) {
        let mut output = Vec::with_capacity(1 + compressed.len() * 4 / 3 + 4);
        output.push(b'.');
        output.extend_from_slice(base64::encode(&compressed).as_bytes());
        output
    } else {
        base64::encode(bytes).into_bytes()
    }
}

/// The inverse of [`encode_urlsafe`].
pub(crate) fn decode_urlsafe(bytes: &[u8]) -> Result<Vec<u8>, BadPayload> {
    let (compressed, encoded) = match bytes.split_first() {
        Some((b'.', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let decoded = base64::decode(encoded).map_err(PayloadDecodeError::Base64)?;

    if compressed {
        let mut decoder = ZlibDecoder::new(&decoded[..]);
        let mut output = Vec::new();
        decoder
            .read_to_end(&mut output)
            .map_err(PayloadDecodeError::Inflate)?;
        Ok(output)
    } else {
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_incompressible() {
        let data = b"x";
        let framed = encode_urlsafe(data);
        assert_eq!(decode_urlsafe(&framed).unwrap(), data);
    }

    #[test]
    fn test_roundtrip_compressible() {
        let data = vec![b'a'; 4096];
        let framed = encode_urlsafe(&data);
        assert_eq!(framed[0], b'.');
        assert_eq!(decode_urlsafe(&framed).unwrap(), data);
    }

    #[test]
    fn test_invalid_base64_does_not_panic() {
        // Matches the Python test suite's
        // `test_invalid_base64_does_not_fail_load_payload` scenario.
        assert!(decode_urlsafe(b"kZ4m3du844lIN!!!").is_err());
    }
}
