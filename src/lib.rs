//! A Rust re-implementation of the Python library [`itsdangerous`].
//!
//! Provides helpers to pass data to untrusted environments and get it back
//! safe and sound. Data is cryptographically signed so that it can be
//! trusted to not have been tampered with, and optionally time-limited so
//! a stale token can be rejected outright.
//!
//! ## Layers
//!
//! * [`Signer`] signs/unsigns arbitrary byte strings.
//! * [`TimestampSigner`] does the same, but threads a base62-encoded
//!   signing time through the token so a verifier can enforce a maximum
//!   age.
//! * [`Serializer`]/[`TimedSerializer`] (and their [`URLSafeSerializer`]/
//!   [`URLSafeTimedSerializer`] aliases) lift both of the above from byte
//!   strings to arbitrary `serde` values, behind the default `serializer`
//!   feature.
//!
//! ## Basic example
//! ```rust
//! use itsdangerous::default_builder;
//!
//! let signer = default_builder("secret key").build().unwrap();
//!
//! let signed = signer.sign("hello world!");
//! let unsigned = signer.unsign(&signed).expect("signature was not valid");
//! assert_eq!(unsigned, b"hello world!");
//! ```
//!
//! ## Serializer example
//! ```rust
//! use itsdangerous::SerializerBuilder;
//!
//! let serializer = SerializerBuilder::new("secret key").build().unwrap();
//! let signed = serializer.dumps(&vec!["a", "b", "c"]).unwrap();
//! let value: Vec<String> = serializer.loads(&signed).unwrap();
//! assert_eq!(value, vec!["a", "b", "c"]);
//! ```
//!
//! [`itsdangerous`]: https://github.com/pallets/itsdangerous/

pub mod base62;
pub mod base64;
mod clock;
pub mod digest;
#[cfg(feature = "serializer")]
pub mod encoding;
pub mod error;
#[cfg(feature = "serializer")]
pub mod framing;
pub mod key_derivation;
pub mod separator;
#[cfg(feature = "serializer")]
pub mod serializer;
pub mod signer;
pub mod timed;

/// Seconds since the Unix epoch at which relative timestamps in this
/// crate's wire format start counting: 2011-01-01T00:00:00Z. Matches the
/// epoch used by the library this crate is a counterpart to, so tokens
/// produced by either remain interoperable.
pub const EPOCH: u64 = 1_293_840_000;

pub use digest::DigestAlgorithm;
pub use error::{
    BadConfigError, BadPayload, BadSignature, BadSignatureKind, BadTimeSignature,
    BadTimeSignatureKind, DumpError, LoadError, PayloadDecodeError, SignatureExpired,
};
pub use key_derivation::KeyDerivation;
pub use separator::Separator;
pub use signer::{default_builder, Signer, SignerBuilder};
pub use timed::TimestampSigner;

#[cfg(feature = "serializer")]
pub use encoding::{Encoder, TextEncoder};
#[cfg(feature = "binary-encoder")]
pub use encoding::BinaryEncoder;
#[cfg(feature = "serializer")]
pub use error::EncodeError;
#[cfg(feature = "serializer")]
pub use serializer::{
    Serializer, SerializerBuilder, TimedSerializer, URLSafeSerializer, URLSafeTimedSerializer,
};
