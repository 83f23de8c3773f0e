//! Lifts [`Signer`]/[`TimestampSigner`] from signing byte strings to
//! signing arbitrary `serde` values, with an optional URL-safe framing
//! layer (deflate + base64url) on top.
//!
//! Framing (raw vs. URL-safe), timestamping (off vs. on), and the encoder
//! (textual vs. binary) are three independent axes. Rather than write
//! sixteen hand-rolled combinations, [`Serializer`] and [`TimedSerializer`]
//! are each generic over the framing and encoder; [`URLSafeSerializer`] and
//! [`URLSafeTimedSerializer`] are plain type aliases that pin the framing
//! parameter to [`UrlSafeFraming`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::encoding::{Encoder, TextEncoder};
use crate::error::{BadConfigError, BadPayload, DumpError, LoadError};
use crate::framing;
use crate::signer::{Signer, SignerBuilder};
use crate::timed::TimestampSigner;
use crate::DigestAlgorithm;
use crate::KeyDerivation;
use crate::Separator;

#[cfg(feature = "binary-encoder")]
use crate::encoding::BinaryEncoder;

static DEFAULT_SALT: &[u8] = b"itsdangerous";

/// How a serializer's payload bytes are framed before signing.
pub trait Framing {
    fn encode(bytes: Vec<u8>) -> Vec<u8>;
    fn decode(bytes: &[u8]) -> Result<Vec<u8>, BadPayload>;
}

/// No framing: the encoder's output is signed as-is. Used by the plain
/// [`Serializer`]/[`TimedSerializer`]; the payload need not be UTF-8.
pub struct RawFraming;

impl Framing for RawFraming {
    fn encode(bytes: Vec<u8>) -> Vec<u8> {
        bytes
    }

    fn decode(bytes: &[u8]) -> Result<Vec<u8>, BadPayload> {
        Ok(bytes.to_vec())
    }
}

/// Deflate-then-base64url framing, applying the compression-gain rule:
/// compress only if it actually shrinks the payload. Used by
/// [`URLSafeSerializer`]/[`URLSafeTimedSerializer`]; the resulting bytes
/// are always ASCII.
pub struct UrlSafeFraming;

impl Framing for UrlSafeFraming {
    fn encode(bytes: Vec<u8>) -> Vec<u8> {
        framing::encode_urlsafe(&bytes)
    }

    fn decode(bytes: &[u8]) -> Result<Vec<u8>, BadPayload> {
        framing::decode_urlsafe(bytes)
    }
}

/// Builds a [`Serializer`]/[`TimedSerializer`] (and their URL-safe
/// aliases), validating its signer configuration at `build()` time.
pub struct SerializerBuilder<C: Encoder = TextEncoder> {
    secret_key: Vec<u8>,
    salt: Vec<u8>,
    separator: Separator,
    digest: DigestAlgorithm,
    key_derivation: KeyDerivation,
    fallback_secret_keys: Vec<Vec<u8>>,
    encoder: C,
}

impl SerializerBuilder<TextEncoder> {
    /// Constructs a new builder using the textual (`serde_json`) encoder.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            salt: DEFAULT_SALT.to_vec(),
            separator: Separator::default(),
            digest: DigestAlgorithm::default(),
            key_derivation: KeyDerivation::default(),
            fallback_secret_keys: Vec::new(),
            encoder: TextEncoder,
        }
    }
}

impl<C: Encoder> SerializerBuilder<C> {
    /// Uses a specific salt. Defaults to `"itsdangerous"`.
    pub fn salt(mut self, salt: impl AsRef<[u8]>) -> Self {
        self.salt = salt.as_ref().to_vec();
        self
    }

    /// Forwards into the inner signer's separator configuration.
    pub fn signer_separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Forwards into the inner signer's digest configuration.
    pub fn signer_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Forwards into the inner signer's key derivation configuration.
    pub fn signer_key_derivation(mut self, key_derivation: KeyDerivation) -> Self {
        self.key_derivation = key_derivation;
        self
    }

    /// Adds a fallback secret key, tried in order on `loads` if the
    /// primary signer's key fails to verify. Useful for rotating a secret
    /// key without invalidating tokens signed under the old one.
    pub fn add_fallback_signer(mut self, secret_key: impl AsRef<[u8]>) -> Self {
        self.fallback_secret_keys.push(secret_key.as_ref().to_vec());
        self
    }

    /// Swaps the textual encoder for the `bincode`-backed binary encoder.
    #[cfg(feature = "binary-encoder")]
    pub fn binary_encoder(self) -> SerializerBuilder<BinaryEncoder> {
        SerializerBuilder {
            secret_key: self.secret_key,
            salt: self.salt,
            separator: self.separator,
            digest: self.digest,
            key_derivation: self.key_derivation,
            fallback_secret_keys: self.fallback_secret_keys,
            encoder: BinaryEncoder,
        }
    }

    fn build_signers(&self) -> Result<Vec<Signer>, BadConfigError> {
        let mut signers = Vec::with_capacity(1 + self.fallback_secret_keys.len());
        signers.push(self.signer_for(&self.secret_key)?);
        for key in &self.fallback_secret_keys {
            signers.push(self.signer_for(key)?);
        }
        Ok(signers)
    }

    fn signer_for(&self, secret_key: &[u8]) -> Result<Signer, BadConfigError> {
        SignerBuilder::new(secret_key)
            .salt(&self.salt)
            .separator(self.separator)
            .digest(self.digest)
            .key_derivation(self.key_derivation)
            .build()
    }

    /// Builds a plain (untimed, raw-framed) [`Serializer`].
    pub fn build(self) -> Result<Serializer<C>, BadConfigError> {
        let signers = self.build_signers()?;
        Ok(Serializer {
            signers,
            encoder: self.encoder,
            _framing: PhantomData,
        })
    }

    /// Builds a [`URLSafeSerializer`].
    pub fn build_url_safe(self) -> Result<URLSafeSerializer<C>, BadConfigError> {
        let signers = self.build_signers()?;
        Ok(Serializer {
            signers,
            encoder: self.encoder,
            _framing: PhantomData,
        })
    }

    /// Builds a [`TimedSerializer`].
    pub fn build_timed(self) -> Result<TimedSerializer<C>, BadConfigError> {
        let signers = self.build_signers()?;
        Ok(TimedSerializer {
            signers,
            encoder: self.encoder,
            _framing: PhantomData,
        })
    }

    /// Builds a [`URLSafeTimedSerializer`].
    pub fn build_url_safe_timed(self) -> Result<URLSafeTimedSerializer<C>, BadConfigError> {
        let signers = self.build_signers()?;
        Ok(TimedSerializer {
            signers,
            encoder: self.encoder,
            _framing: PhantomData,
        })
    }
}

/// Finds the first signer whose key verifies `signed`, trying the primary
/// signer first and each fallback key in order, preserving the primary
/// signer's error if every signer fails.
fn unsign_with_fallback<'a>(
    signers: &[Signer],
    signed: &'a [u8],
) -> Result<&'a [u8], LoadError> {
    let mut primary_error = None;
    for signer in signers {
        match signer.unsign(signed) {
            Ok(value) => return Ok(value),
            Err(err) => {
                if primary_error.is_none() {
                    primary_error = Some(err);
                }
            }
        }
    }
    Err(primary_error.expect("signers is never empty").into())
}

fn unsign_timed_with_fallback<'a>(
    signers: &[Signer],
    signed: &'a [u8],
    max_age: Option<i64>,
    now: u64,
) -> Result<(&'a [u8], u64), LoadError> {
    let mut primary_error = None;
    for signer in signers {
        match TimestampSigner::new(signer).unsign(signed, max_age, now) {
            Ok(result) => return Ok(result),
            Err(err) => {
                if primary_error.is_none() {
                    primary_error = Some(err);
                }
            }
        }
    }
    Err(primary_error.expect("signers is never empty"))
}

/// Signs and verifies arbitrary `serde` values, with no timestamp.
///
/// `F` selects [`RawFraming`] (default, the payload need not be UTF-8) or
/// [`UrlSafeFraming`] (via the [`URLSafeSerializer`] alias, guaranteeing a
/// printable token).
pub struct Serializer<C: Encoder = TextEncoder, F: Framing = RawFraming> {
    signers: Vec<Signer>,
    encoder: C,
    _framing: PhantomData<F>,
}

/// The URL-safe alias of [`Serializer`]: payload bytes are deflated and
/// base64url-encoded before signing, per the compression-gain rule in
/// [`crate::framing`].
pub type URLSafeSerializer<C = TextEncoder> = Serializer<C, UrlSafeFraming>;

impl<C: Encoder, F: Framing> Serializer<C, F> {
    /// Serializes `value`, frames it, and signs the result.
    pub fn dumps<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, crate::error::EncodeError> {
        let encoded = self.encoder.encode(value)?;
        let framed = F::encode(encoded);
        Ok(self.signers[0].sign(framed))
    }

    /// As [`dumps`](Self::dumps), but writes the signed token straight to
    /// `writer` instead of returning it.
    pub fn dump<T: Serialize, W: std::io::Write>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> Result<(), DumpError> {
        let signed = self.dumps(value)?;
        writer.write_all(&signed)?;
        Ok(())
    }

    /// Verifies `signed` and decodes the recovered payload.
    pub fn loads<T: DeserializeOwned>(&self, signed: &[u8]) -> Result<T, LoadError> {
        let framed = unsign_with_fallback(&self.signers, signed)?;
        Ok(self.load_payload(framed)?)
    }

    /// Decodes `payload` without verifying any signature. Used to recover
    /// the value a caller attempted to smuggle through a forged or
    /// tampered token, or to decode a payload obtained out of band.
    pub fn load_payload<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, BadPayload> {
        let decompressed = F::decode(payload)?;
        Ok(self.encoder.decode(&decompressed)?)
    }

    /// Verifies and decodes `signed`, but never propagates a signature
    /// failure as an error: returns `(true, Some(value))` on success, or
    /// `(false, recovered_value)` if the signature did not verify (the
    /// recovered value is `None` if the payload itself could not be
    /// decoded either). A genuine `BadPayload` error (the signature
    /// verified but the payload was not decodable) still propagates,
    /// since that is not a forgery, it's a real bug.
    pub fn loads_unsafe<T: DeserializeOwned>(
        &self,
        signed: &[u8],
    ) -> Result<(bool, Option<T>), BadPayload> {
        match self.loads(signed) {
            Ok(value) => Ok((true, Some(value))),
            Err(LoadError::BadPayload(err)) => Err(err),
            Err(err) => {
                let recovered = err
                    .payload()
                    .and_then(|payload| self.load_payload(payload).ok());
                Ok((false, recovered))
            }
        }
    }
}

/// Signs and verifies arbitrary `serde` values with a base62-encoded
/// signing timestamp, so expired tokens can be rejected at `loads` time.
pub struct TimedSerializer<C: Encoder = TextEncoder, F: Framing = RawFraming> {
    signers: Vec<Signer>,
    encoder: C,
    _framing: PhantomData<F>,
}

/// The URL-safe alias of [`TimedSerializer`].
pub type URLSafeTimedSerializer<C = TextEncoder> = TimedSerializer<C, UrlSafeFraming>;

impl<C: Encoder, F: Framing> TimedSerializer<C, F> {
    /// Serializes `value`, frames it, and signs the result together with
    /// the current time (read once, from the system clock).
    pub fn dumps<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, crate::error::EncodeError> {
        let encoded = self.encoder.encode(value)?;
        let framed = F::encode(encoded);
        Ok(TimestampSigner::new(&self.signers[0]).sign(framed))
    }

    /// Serializes and signs `value` with an explicit `now`, bypassing the
    /// system clock; the entry point tests should use.
    pub fn dumps_at<T: Serialize>(
        &self,
        value: &T,
        now: u64,
    ) -> Result<Vec<u8>, crate::error::EncodeError> {
        let encoded = self.encoder.encode(value)?;
        let framed = F::encode(encoded);
        Ok(TimestampSigner::new(&self.signers[0]).sign_at(framed, now))
    }

    /// As [`dumps`](Self::dumps), but writes the signed token straight to
    /// `writer` instead of returning it.
    pub fn dump<T: Serialize, W: std::io::Write>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> Result<(), DumpError> {
        let signed = self.dumps(value)?;
        writer.write_all(&signed)?;
        Ok(())
    }

    /// Verifies `signed` (optionally enforcing `max_age` seconds against
    /// `now`) and decodes the recovered payload.
    pub fn loads<T: DeserializeOwned>(
        &self,
        signed: &[u8],
        max_age: Option<i64>,
        now: u64,
    ) -> Result<T, LoadError> {
        let (framed, _date_signed) =
            unsign_timed_with_fallback(&self.signers, signed, max_age, now)?;
        Ok(self.load_payload(framed)?)
    }

    /// As [`loads`](Self::loads), but also returns the signing time in
    /// seconds since the Unix epoch.
    pub fn loads_with_timestamp<T: DeserializeOwned>(
        &self,
        signed: &[u8],
        max_age: Option<i64>,
        now: u64,
    ) -> Result<(T, u64), LoadError> {
        let (framed, date_signed) =
            unsign_timed_with_fallback(&self.signers, signed, max_age, now)?;
        Ok((self.load_payload(framed)?, date_signed))
    }

    /// Decodes `payload` without verifying any signature or timestamp.
    pub fn load_payload<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, BadPayload> {
        let decompressed = F::decode(payload)?;
        Ok(self.encoder.decode(&decompressed)?)
    }

    /// As [`Serializer::loads_unsafe`], but for timestamped tokens.
    pub fn loads_unsafe<T: DeserializeOwned>(
        &self,
        signed: &[u8],
        max_age: Option<i64>,
        now: u64,
    ) -> Result<(bool, Option<T>), BadPayload> {
        match self.loads(signed, max_age, now) {
            Ok(value) => Ok((true, Some(value))),
            Err(LoadError::BadPayload(err)) => Err(err),
            Err(err) => {
                let recovered = err
                    .payload()
                    .and_then(|payload| self.load_payload(payload).ok());
                Ok((false, recovered))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dumps_loads() {
        let serializer = SerializerBuilder::new("secret-key").build().unwrap();
        let signed = serializer.dumps(&"hello").unwrap();
        let value: String = serializer.loads(&signed).unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_decode_detects_tampering() {
        let serializer = SerializerBuilder::new("secret-key").build().unwrap();
        let mut signed = serializer.dumps(&"hello").unwrap();
        let last = signed.len() - 1;
        signed[last] = if signed[last] == b'A' { b'B' } else { b'A' };
        assert!(serializer.loads::<String>(&signed).is_err());
    }

    #[test]
    fn test_url_safe_roundtrip() {
        let serializer = SerializerBuilder::new("secret-key")
            .build_url_safe()
            .unwrap();
        let signed = serializer.dumps(&vec!["a", "b", "c"]).unwrap();
        assert!(signed.iter().all(|&b| b.is_ascii()));
        let value: Vec<String> = serializer.loads(&signed).unwrap();
        assert_eq!(value, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_url_safe_invalid_base64_load_payload() {
        // Matches the Python test suite's
        // `test_invalid_base64_does_not_fail_load_payload` scenario.
        let serializer = SerializerBuilder::new("aha!").build_url_safe().unwrap();
        let result: Result<String, _> = serializer.load_payload(b"kZ4m3du844lIN");
        assert!(result.is_err());
    }

    #[test]
    fn test_timed_dumps_loads() {
        let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
        let signed = serializer.dumps_at(&"hello", crate::EPOCH).unwrap();
        let value: String = serializer.loads(&signed, None, crate::EPOCH + 5).unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_timed_expiry() {
        let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
        let signed = serializer.dumps_at(&"hello", crate::EPOCH).unwrap();
        assert!(serializer
            .loads::<String>(&signed, Some(9), crate::EPOCH + 10)
            .is_err());
        assert!(serializer
            .loads::<String>(&signed, Some(10), crate::EPOCH + 10)
            .is_ok());
    }

    #[test]
    fn test_loads_unsafe_recovers_payload() {
        let serializer = SerializerBuilder::new("secret-key").build().unwrap();
        let mut signed = serializer.dumps(&"hello").unwrap();
        let last = signed.len() - 1;
        signed[last] = if signed[last] == b'A' { b'B' } else { b'A' };

        let (valid, value): (bool, Option<String>) = serializer.loads_unsafe(&signed).unwrap();
        assert!(!valid);
        assert_eq!(value, Some("hello".to_string()));
    }

    #[test]
    fn test_timed_loads_unsafe_recovers_payload() {
        // A tampered timestamped token must still recover its payload: the
        // timestamp segment has to be stripped off the error's payload
        // before `load_payload` ever sees it.
        let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
        let mut signed = serializer.dumps_at(&"hello", crate::EPOCH).unwrap();
        let last = signed.len() - 1;
        signed[last] = if signed[last] == b'A' { b'B' } else { b'A' };

        let (valid, value): (bool, Option<String>) = serializer
            .loads_unsafe(&signed, None, crate::EPOCH)
            .unwrap();
        assert!(!valid);
        assert_eq!(value, Some("hello".to_string()));
    }

    #[test]
    fn test_dump_into_writer() {
        let serializer = SerializerBuilder::new("secret-key").build().unwrap();
        let mut buffer = Vec::new();
        serializer.dump(&"hello", &mut buffer).unwrap();
        let value: String = serializer.loads(&buffer).unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_fallback_signer_preserves_primary_error() {
        let serializer = SerializerBuilder::new("new-key")
            .add_fallback_signer("old-key")
            .build()
            .unwrap();

        let old_serializer = SerializerBuilder::new("old-key").build().unwrap();
        let signed = old_serializer.dumps(&"hello").unwrap();

        let value: String = serializer.loads(&signed).unwrap();
        assert_eq!(value, "hello");
    }
}
