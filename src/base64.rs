//! URL-safe, unpadded base64: the alphabet used for signatures and for
//! raw (non-URL-safe-serializer) payloads.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

pub use base64::DecodeError;

static BASE64_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

/// Encodes bytes as URL-safe, unpadded base64.
#[inline(always)]
pub(crate) fn encode<T>(input: &T) -> String
where
    T: ?Sized + AsRef<[u8]>,
{
    URL_SAFE_NO_PAD.encode(input)
}

/// Decodes a URL-safe, unpadded base64 string back to bytes.
#[inline(always)]
pub(crate) fn decode<T>(input: &T) -> Result<Vec<u8>, DecodeError>
where
    T: ?Sized + AsRef<[u8]>,
{
    URL_SAFE_NO_PAD.decode(input)
}

/// Whether `c` is a member of the URL-safe base64 alphabet. Used to reject
/// separator characters that would make a signed value ambiguous to split.
pub(crate) fn in_alphabet(c: char) -> bool {
    BASE64_ALPHABET.contains(c)
}
