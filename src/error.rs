//! The error taxonomy produced by every layer of this crate.
//!
//! Mirrors the exception hierarchy of the Python library this crate is a
//! port of: `BadSignature` is the umbrella for "the MAC didn't check out",
//! `BadTimeSignature` narrows that to the timestamped signer, and
//! `SignatureExpired` narrows it further to "checked out, but too old".
//! `BadPayload` is a disjoint branch for payload decoding failures (framing,
//! inflate, or the encoder itself), and `BadConfigError` only ever occurs at
//! construction time, never while signing or verifying.

use std::fmt;

use thiserror::Error;

/// Why a plain [`crate::Signer`] rejected a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadSignatureKind {
    /// The separator character was not found in the value at all.
    #[error("separator not found in value")]
    SeparatorNotFound,
    /// A separator was found, but the signature following it did not match.
    #[error("signature does not match")]
    SignatureMismatch,
}

/// A token failed to verify against a plain [`crate::Signer`].
///
/// `payload` holds the bytes preceding the (invalid) signature whenever they
/// could be recovered, so a caller can still feed them to
/// [`crate::Serializer::load_payload`] to see what an attacker was trying to
/// smuggle through. The signature check rejects the token either way, but
/// the payload itself was never the thing that failed.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct BadSignature {
    pub payload: Option<Vec<u8>>,
    pub kind: BadSignatureKind,
}

impl BadSignature {
    pub(crate) fn separator_not_found() -> Self {
        Self {
            payload: None,
            kind: BadSignatureKind::SeparatorNotFound,
        }
    }

    pub(crate) fn signature_mismatch(payload: &[u8]) -> Self {
        Self {
            payload: Some(payload.to_vec()),
            kind: BadSignatureKind::SignatureMismatch,
        }
    }
}

/// Why a [`crate::TimestampSigner`] rejected a token.
#[derive(Debug, Error)]
pub enum BadTimeSignatureKind {
    /// The underlying MAC itself didn't check out.
    #[error(transparent)]
    Signature(#[from] BadSignatureKind),
    /// The MAC checked out, but there was no timestamp segment to split off.
    #[error("timestamp missing")]
    TimestampMissing,
    /// The MAC checked out, but the timestamp segment didn't decode as base62.
    #[error("malformed timestamp")]
    TimestampMalformed,
}

/// A token failed to verify, or failed to yield a usable timestamp, against a
/// [`crate::TimestampSigner`].
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct BadTimeSignature {
    pub payload: Option<Vec<u8>>,
    pub kind: BadTimeSignatureKind,
}

impl BadTimeSignature {
    /// Builds a `BadTimeSignature` from an inner `Signer::unsign` failure.
    /// `payload` is the caller-supplied recovered payload with any
    /// timestamp segment already stripped off, so it matches what
    /// `load_payload` expects; the MAC failure kind is carried through
    /// unchanged.
    pub(crate) fn from_bad_signature(kind: BadSignatureKind, payload: Option<Vec<u8>>) -> Self {
        Self {
            payload,
            kind: BadTimeSignatureKind::Signature(kind),
        }
    }

    pub(crate) fn timestamp_missing(payload: &[u8]) -> Self {
        Self {
            payload: Some(payload.to_vec()),
            kind: BadTimeSignatureKind::TimestampMissing,
        }
    }

    pub(crate) fn timestamp_malformed(payload: &[u8]) -> Self {
        Self {
            payload: Some(payload.to_vec()),
            kind: BadTimeSignatureKind::TimestampMalformed,
        }
    }
}

/// The signature and timestamp both checked out, but the token is older than
/// the caller's `max_age`.
#[derive(Error)]
#[error("signature age {age} > {max_age} seconds")]
pub struct SignatureExpired {
    pub payload: Option<Vec<u8>>,
    /// Seconds since the Unix epoch at which the token was signed.
    pub date_signed: u64,
    pub age: i64,
    pub max_age: i64,
}

impl fmt::Debug for SignatureExpired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureExpired")
            .field("date_signed", &self.date_signed)
            .field("age", &self.age)
            .field("max_age", &self.max_age)
            .finish()
    }
}

/// A failure to turn a value into bytes via the pluggable
/// [`crate::encoding::Encoder`]. Kept disjoint from [`PayloadDecodeError`]
/// since encoding failures only ever occur on the `dumps` side, before any
/// signature is computed.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[cfg(feature = "serializer")]
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "binary-encoder")]
    #[error("bincode encoding failed: {0}")]
    Bincode(#[from] bincode::Error),
}

/// A decode failure one layer below [`BadPayload`]: the framing, the
/// decompression, or the pluggable [`crate::encoding::Encoder`] itself.
#[derive(Debug, Error)]
pub enum PayloadDecodeError {
    #[error("base64 decoding failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("inflate failed: {0}")]
    Inflate(#[source] std::io::Error),
    #[cfg(feature = "serializer")]
    #[error("json decoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "binary-encoder")]
    #[error("bincode decoding failed: {0}")]
    Bincode(#[from] bincode::Error),
}

/// The verified payload could not be turned back into a value: either the
/// URL-safe framing/inflate step failed, or the [`crate::encoding::Encoder`]
/// rejected the decompressed bytes. This only ever happens *after* signature
/// verification succeeds: an attacker cannot trigger it by forging a
/// signature, only by crafting a payload that verifies against a key they
/// happen to hold.
#[derive(Debug, Error)]
#[error("payload could not be decoded: {source}")]
pub struct BadPayload {
    #[source]
    pub source: PayloadDecodeError,
}

impl From<PayloadDecodeError> for BadPayload {
    fn from(source: PayloadDecodeError) -> Self {
        Self { source }
    }
}

/// Raised by a builder's `build()` when the requested configuration can
/// never produce a valid signer or serializer: an out-of-alphabet
/// separator, or an unrecognized key-derivation/digest name. Never raised
/// while signing or verifying.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BadConfigError(pub String);

/// Failure mode of [`crate::Serializer::dump`]/[`crate::TimedSerializer::dump`]:
/// either the value could not be encoded, or writing the resulting token to
/// the destination failed.
#[derive(Debug, Error)]
pub enum DumpError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("writing token failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The error type returned by [`crate::Serializer::loads`] and friends,
/// unifying every way verification or decoding can fail so callers can match
/// on `kind` rather than sniff message text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    BadSignature(#[from] BadSignature),
    #[error(transparent)]
    BadTimeSignature(#[from] BadTimeSignature),
    #[error(transparent)]
    SignatureExpired(#[from] SignatureExpired),
    #[error(transparent)]
    BadPayload(#[from] BadPayload),
}

impl LoadError {
    /// The payload recoverable from this error, if any: the bytes that
    /// were signed (for a `BadSignature`/`BadTimeSignature`/
    /// `SignatureExpired`) or `None` for a `BadPayload`, which by
    /// definition already passed signature verification and so never
    /// needs recovering.
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            LoadError::BadSignature(e) => e.payload.as_deref(),
            LoadError::BadTimeSignature(e) => e.payload.as_deref(),
            LoadError::SignatureExpired(e) => e.payload.as_deref(),
            LoadError::BadPayload(_) => None,
        }
    }
}
