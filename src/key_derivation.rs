//! Key derivation schemes.
//!
//! Turns a `(secret_key, salt)` pair into the bytes actually used as the
//! HMAC key. This is not intended to stretch a weak password into a strong
//! key (callers still need to supply a large random secret); it exists so
//! multiple signers can share one secret key while remaining
//! cryptographically independent via distinct salts.

use std::str::FromStr;

use crate::digest::DigestAlgorithm;
use crate::error::BadConfigError;

/// Selects how a signing key is derived from `(secret_key, salt)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDerivation {
    /// `digest(salt + secret_key)`
    Concat,
    /// `digest(salt + "signer" + secret_key)`, the default, matching the
    /// library this crate is a counterpart to.
    DjangoConcat,
    /// `hmac<digest>(secret_key, input=salt)`
    Hmac,
    /// No derivation: the secret key is used verbatim. Only appropriate
    /// when the secret key is already a uniformly random value dedicated
    /// to this signer.
    None,
}

impl Default for KeyDerivation {
    fn default() -> Self {
        KeyDerivation::DjangoConcat
    }
}

impl FromStr for KeyDerivation {
    type Err = BadConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" => Ok(KeyDerivation::Concat),
            "django-concat" => Ok(KeyDerivation::DjangoConcat),
            "hmac" => Ok(KeyDerivation::Hmac),
            "none" => Ok(KeyDerivation::None),
            other => Err(BadConfigError(format!(
                "unknown key derivation scheme: {other}"
            ))),
        }
    }
}

impl KeyDerivation {
    pub(crate) fn derive(self, digest: DigestAlgorithm, secret_key: &[u8], salt: &[u8]) -> Vec<u8> {
        match self {
            KeyDerivation::Concat => {
                let mut input = Vec::with_capacity(salt.len() + secret_key.len());
                input.extend_from_slice(salt);
                input.extend_from_slice(secret_key);
                digest.hash(&input)
            }
            KeyDerivation::DjangoConcat => {
                let mut input = Vec::with_capacity(salt.len() + 6 + secret_key.len());
                input.extend_from_slice(salt);
                input.extend_from_slice(b"signer");
                input.extend_from_slice(secret_key);
                digest.hash(&input)
            }
            KeyDerivation::Hmac => digest.hmac(secret_key, salt),
            KeyDerivation::None => secret_key.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("concat".parse(), Ok(KeyDerivation::Concat));
        assert_eq!("django-concat".parse(), Ok(KeyDerivation::DjangoConcat));
        assert_eq!("hmac".parse(), Ok(KeyDerivation::Hmac));
        assert_eq!("none".parse(), Ok(KeyDerivation::None));
        assert!("bogus".parse::<KeyDerivation>().is_err());
    }

    #[test]
    fn test_none_is_verbatim() {
        assert_eq!(
            KeyDerivation::None.derive(DigestAlgorithm::Sha1, b"secret", b"salt"),
            b"secret"
        );
    }

    #[test]
    fn test_concat_variants_disagree() {
        let concat = KeyDerivation::Concat.derive(DigestAlgorithm::Sha256, b"secret", b"salt");
        let django = KeyDerivation::DjangoConcat.derive(DigestAlgorithm::Sha256, b"secret", b"salt");
        assert_ne!(concat, django);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = KeyDerivation::Hmac.derive(DigestAlgorithm::Sha1, b"secret", b"salt");
        let b = KeyDerivation::Hmac.derive(DigestAlgorithm::Sha1, b"secret", b"salt");
        assert_eq!(a, b);
    }
}
