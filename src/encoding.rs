//! Pluggable value encoders.
//!
//! A [`Signer`](crate::Signer) only ever sees bytes. An [`Encoder`] is what
//! lifts a `Serializer` from signing byte strings to signing arbitrary
//! `serde` values, turning a value into the bytes that get signed and back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{EncodeError, PayloadDecodeError};

/// Converts values to and from bytes for a [`crate::Serializer`].
pub trait Encoder {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError>;
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PayloadDecodeError>;
}

/// The default encoder: compact JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl Encoder for TextEncoder {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PayloadDecodeError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// A binary encoder backed by `bincode`.
///
/// Security note: `bincode` deserializes into Rust types by trusting the
/// byte layout of the input. This is safe here only because payload bytes
/// are never decoded until *after* the HMAC signature has verified; an
/// attacker without the secret key cannot produce bytes that reach this
/// decoder at all. Never reuse this encoder to decode untrusted bytes that
/// have not first passed through a [`crate::Signer::unsign`] call.
#[cfg(feature = "binary-encoder")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryEncoder;

#[cfg(feature = "binary-encoder")]
impl Encoder for BinaryEncoder {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        Ok(bincode::serialize(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, PayloadDecodeError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Example {
        name: String,
        count: u32,
    }

    #[test]
    fn test_text_encoder_roundtrip() {
        let encoder = TextEncoder;
        let value = Example {
            name: "widget".to_string(),
            count: 3,
        };
        let encoded = encoder.encode(&value).unwrap();
        let decoded: Example = encoder.decode(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_text_encoder_rejects_garbage() {
        let encoder = TextEncoder;
        assert!(encoder.decode::<Example>(b"not json").is_err());
    }

    #[cfg(feature = "binary-encoder")]
    #[test]
    fn test_binary_encoder_roundtrip() {
        let encoder = BinaryEncoder;
        let value = Example {
            name: "widget".to_string(),
            count: 3,
        };
        let encoded = encoder.encode(&value).unwrap();
        let decoded: Example = encoder.decode(&encoded).unwrap();
        assert_eq!(value, decoded);
    }
}
