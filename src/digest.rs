//! Runtime-selectable digest algorithms.
//!
//! The signer needs to pick its digest at construction time rather than at
//! compile time, so instead of making every type generic over a RustCrypto
//! digest we dispatch through this enum. Each variant carries no data; it
//! just selects which concrete `hmac::Hmac<D>` (or bare hash, for key
//! derivation) backs the signer.

use std::str::FromStr;

use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha512};

use crate::error::BadConfigError;

/// The hash function used both to derive the signing key and to compute
/// the HMAC over a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha512,
    Md5,
}

impl Default for DigestAlgorithm {
    fn default() -> Self {
        DigestAlgorithm::Sha1
    }
}

impl FromStr for DigestAlgorithm {
    type Err = BadConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha1" => Ok(DigestAlgorithm::Sha1),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha512" => Ok(DigestAlgorithm::Sha512),
            "md5" => Ok(DigestAlgorithm::Md5),
            other => Err(BadConfigError(format!("unknown digest algorithm: {other}"))),
        }
    }
}

impl DigestAlgorithm {
    /// The size, in bytes, of this algorithm's raw digest output.
    pub fn output_size(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
            DigestAlgorithm::Md5 => 16,
        }
    }

    /// Plain (non-keyed) hash of `input`, used by the `Concat` and
    /// `DjangoConcat` key derivation schemes.
    pub(crate) fn hash(self, input: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => {
                let mut hasher = Sha1::new();
                hasher.update(input);
                hasher.finalize().to_vec()
            }
            DigestAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(input);
                hasher.finalize().to_vec()
            }
            DigestAlgorithm::Sha512 => {
                let mut hasher = Sha512::new();
                hasher.update(input);
                hasher.finalize().to_vec()
            }
            DigestAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                hasher.update(input);
                hasher.finalize().to_vec()
            }
        }
    }

    /// Computes an HMAC of `message` keyed by `key`.
    pub(crate) fn hmac(self, key: &[u8], message: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Sha1 => {
                let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            DigestAlgorithm::Sha256 => {
                let mut mac =
                    Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            DigestAlgorithm::Sha512 => {
                let mut mac =
                    Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
            DigestAlgorithm::Md5 => {
                let mut mac = Hmac::<Md5>::new_from_slice(key).expect("HMAC accepts any key length");
                mac.update(message);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }

    /// Verifies an HMAC in constant time. Never builds the candidate
    /// signature as a separate buffer to compare byte-by-byte; relies on
    /// `hmac::Mac::verify_slice`'s constant-time comparison.
    pub(crate) fn hmac_verify(self, key: &[u8], message: &[u8], signature: &[u8]) -> bool {
        match self {
            DigestAlgorithm::Sha1 => Hmac::<Sha1>::new_from_slice(key)
                .expect("HMAC accepts any key length")
                .chain_update(message)
                .verify_slice(signature)
                .is_ok(),
            DigestAlgorithm::Sha256 => Hmac::<Sha256>::new_from_slice(key)
                .expect("HMAC accepts any key length")
                .chain_update(message)
                .verify_slice(signature)
                .is_ok(),
            DigestAlgorithm::Sha512 => Hmac::<Sha512>::new_from_slice(key)
                .expect("HMAC accepts any key length")
                .chain_update(message)
                .verify_slice(signature)
                .is_ok(),
            DigestAlgorithm::Md5 => Hmac::<Md5>::new_from_slice(key)
                .expect("HMAC accepts any key length")
                .chain_update(message)
                .verify_slice(signature)
                .is_ok(),
        }
    }
}
