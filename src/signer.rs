use crate::base64;
use crate::digest::DigestAlgorithm;
use crate::error::{BadConfigError, BadSignature};
use crate::key_derivation::KeyDerivation;
use crate::separator::Separator;

static DEFAULT_SALT: &[u8] = b"itsdangerous.Signer";

/// Builds a [`Signer`], validating its configuration up front so that a
/// bad separator or an unresolvable key derivation scheme surfaces as a
/// [`BadConfigError`] at construction time, never while signing or
/// verifying.
pub struct SignerBuilder {
    secret_key: Vec<u8>,
    salt: Vec<u8>,
    separator: Separator,
    digest: DigestAlgorithm,
    key_derivation: KeyDerivation,
}

/// Constructs a signer builder using SHA-1, HMAC, and `DjangoConcat` key
/// derivation, the same defaults the library this crate is a counterpart
/// to ships.
pub fn default_builder(secret_key: impl AsRef<[u8]>) -> SignerBuilder {
    SignerBuilder::new(secret_key)
}

impl SignerBuilder {
    /// Constructs a new signer builder with a given secret key. Uses the
    /// default salt, separator, digest, and key derivation scheme until
    /// overridden.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
            salt: DEFAULT_SALT.to_vec(),
            separator: Separator::default(),
            digest: DigestAlgorithm::default(),
            key_derivation: KeyDerivation::default(),
        }
    }

    /// Uses a specific salt with the signer. If no salt is set, defaults
    /// to `"itsdangerous.Signer"`.
    pub fn salt(mut self, salt: impl AsRef<[u8]>) -> Self {
        self.salt = salt.as_ref().to_vec();
        self
    }

    /// Uses a specific separator with the signer. If no separator is
    /// set, defaults to `.`.
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Uses a specific digest algorithm for key derivation and the HMAC.
    pub fn digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Uses a specific key derivation scheme.
    pub fn key_derivation(mut self, key_derivation: KeyDerivation) -> Self {
        self.key_derivation = key_derivation;
        self
    }

    /// Builds a [`Signer`] from this configuration. Infallible in practice:
    /// the only way this crate can produce a [`BadConfigError`] is an
    /// out-of-alphabet [`Separator`], and [`Separator::new`] already
    /// refuses to construct one, so by the time a `Separator` value reaches
    /// here it has already been validated. Still returns a `Result` so a
    /// future key-derivation/digest combination that can fail has somewhere
    /// to report it without breaking this signature.
    pub fn build(self) -> Result<Signer, BadConfigError> {
        let derived_key = self
            .key_derivation
            .derive(self.digest, &self.secret_key, &self.salt);

        Ok(Signer {
            derived_key,
            separator: self.separator,
            digest: self.digest,
        })
    }
}

/// Signs and verifies byte strings against a keyed HMAC.
///
/// A salt namespaces the derived key, so the same secret key can back
/// multiple signers whose tokens are not interchangeable. Leaving the
/// salt at its default, or reusing one salt for two unrelated signed
/// values, means a token valid in one context is also valid in the
/// other, usually not what you want.
///
/// # Basic usage
/// ```rust
/// use itsdangerous::default_builder;
///
/// let signer = default_builder("secret key").build().unwrap();
/// let signed = signer.sign("hello world!");
/// let unsigned = signer.unsign(&signed).expect("signature was not valid");
/// assert_eq!(unsigned, b"hello world!");
/// ```
pub struct Signer {
    derived_key: Vec<u8>,
    pub(crate) separator: Separator,
    digest: DigestAlgorithm,
}

impl Signer {
    /// Signs `value`, returning `value || separator || base64(hmac(value))`.
    pub fn sign(&self, value: impl AsRef<[u8]>) -> Vec<u8> {
        let value = value.as_ref();
        let signature = self.get_signature(value);
        let encoded_signature = base64::encode(&signature);

        let mut output = Vec::with_capacity(value.len() + 1 + encoded_signature.len());
        output.extend_from_slice(value);
        output.push(self.separator.as_byte());
        output.extend_from_slice(encoded_signature.as_bytes());
        output
    }

    /// Unsigns `signed`, the logical inverse of [`sign`](Signer::sign).
    ///
    /// Returns a slice borrowed from `signed` on success, so no copy is
    /// made of the verified payload.
    pub fn unsign<'a>(&self, signed: &'a [u8]) -> Result<&'a [u8], BadSignature> {
        let (value, encoded_signature) = self.separator.rsplit(signed)?;

        let signature = base64::decode(encoded_signature)
            .map_err(|_| BadSignature::signature_mismatch(value))?;

        if self.digest.hmac_verify(&self.derived_key, value, &signature) {
            Ok(value)
        } else {
            Err(BadSignature::signature_mismatch(value))
        }
    }

    /// Returns whether `signed` currently carries a valid signature,
    /// without exposing the underlying value.
    pub fn validate(&self, signed: &[u8]) -> bool {
        self.unsign(signed).is_ok()
    }

    /// Computes the raw HMAC over `value` using this signer's derived key.
    pub(crate) fn get_signature(&self, value: &[u8]) -> Vec<u8> {
        self.digest.hmac(&self.derived_key, value)
    }

    pub(crate) fn separator(&self) -> Separator {
        self.separator
    }
}
