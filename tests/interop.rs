//! Pins the literal seed scenarios shared with the Python library this
//! crate is a counterpart to, so the wire format cannot silently drift.

use itsdangerous::{
    default_builder, DigestAlgorithm, KeyDerivation, LoadError, SerializerBuilder, EPOCH,
};

#[test]
fn test_signer_compatibility_vector() {
    let signer = default_builder("hello").build().unwrap();
    let signed = signer.sign("this is a test");
    assert_eq!(signed, b"this is a test.hgGT0Zoara4L13FX3_xm-xmfa_0");
}

#[test]
fn test_signer_kwargs_md5_hmac() {
    // Mirrors tests.py's SerializerTestCase.test_signer_kwargs:
    // digest_method=hashlib.md5, key_derivation='hmac'.
    let signer = default_builder("secret-key")
        .digest(DigestAlgorithm::Md5)
        .key_derivation(KeyDerivation::Hmac)
        .build()
        .unwrap();
    let signed = signer.sign("my string");
    assert_eq!(signer.unsign(&signed).unwrap(), b"my string");
}

#[test]
fn test_decode_detects_tampering_transforms() {
    // Mirrors tests.py's SerializerTestCase.test_decode_detects_tampering,
    // which tries several mutations of a valid token and expects every one
    // to fail verification.
    let serializer = SerializerBuilder::new("secret-key").build().unwrap();
    let signed = serializer.dumps(&"my string").unwrap();
    let signed_str = String::from_utf8(signed.clone()).unwrap();

    // Transform: uppercase the whole token.
    let uppercased = signed_str.to_uppercase().into_bytes();
    assert!(serializer.loads::<String>(&uppercased).is_err());

    // Transform: append a byte.
    let mut appended = signed.clone();
    appended.push(b'a');
    assert!(serializer.loads::<String>(&appended).is_err());

    // Transform: replace the payload prefix with something else.
    let mut prefix_replaced = b"xxxxxxxxxxx".to_vec();
    let separator_index = signed.iter().rposition(|&b| b == b'.').unwrap();
    prefix_replaced.extend_from_slice(&signed[separator_index..]);
    assert!(serializer.loads::<String>(&prefix_replaced).is_err());

    // Transform: remove the separator entirely.
    let without_separator: Vec<u8> = signed.iter().copied().filter(|&b| b != b'.').collect();
    assert!(serializer.loads::<String>(&without_separator).is_err());
}

#[test]
fn test_accepts_unicode() {
    let serializer = SerializerBuilder::new("secret-key").build().unwrap();
    let signed = serializer.dumps(&"\u{2603}").unwrap(); // snowman
    let value: String = serializer.loads(&signed).unwrap();
    assert_eq!(value, "\u{2603}");
}

#[test]
fn test_exception_attributes_bad_signature_payload() {
    // Mirrors tests.py's test_exception_attributes:
    // e.payload == ts.rsplit(b'.', 1)[0]
    let serializer = SerializerBuilder::new("secret-key").build().unwrap();
    let signed = serializer.dumps(&"my string").unwrap();
    let separator_index = signed.iter().rposition(|&b| b == b'.').unwrap();
    let expected_payload = &signed[..separator_index];

    let mut tampered = signed.clone();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };

    let err = serializer.loads::<String>(&tampered).unwrap_err();
    assert_eq!(err.payload(), Some(expected_payload));
}

#[test]
fn test_exception_attributes_expired_payload() {
    // Mirrors tests.py's TimedSerializerTestCase.test_exception_attributes
    // with max_age=-1 -> always expired.
    let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
    let signed = serializer.dumps_at(&"my string", EPOCH).unwrap();

    let err = serializer
        .loads::<String>(&signed, Some(-1), EPOCH)
        .unwrap_err();
    assert!(matches!(err, LoadError::SignatureExpired(_)));
    assert_eq!(err.payload(), Some(&b"\"my string\""[..]));
}

#[test]
fn test_decode_with_timeout_boundaries() {
    // Mirrors tests.py's TimedSerializerTestCase.test_decode_with_timeout,
    // which pins "now" to EPOCH and checks max_age=11/10/9 at a 10-second
    // remove.
    let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
    let signed = serializer.dumps_at(&"value", EPOCH).unwrap();

    assert!(serializer.loads::<String>(&signed, Some(11), EPOCH + 10).is_ok());
    assert!(serializer.loads::<String>(&signed, Some(10), EPOCH + 10).is_ok());
    assert!(serializer.loads::<String>(&signed, Some(9), EPOCH + 10).is_err());
}

#[test]
fn test_decode_return_timestamp() {
    let serializer = SerializerBuilder::new("secret-key").build_timed().unwrap();
    let signed = serializer.dumps_at(&"value", EPOCH + 42).unwrap();

    let (value, date_signed) = serializer
        .loads_with_timestamp::<String>(&signed, None, EPOCH + 42)
        .unwrap();
    assert_eq!(value, "value");
    assert_eq!(date_signed, EPOCH + 42);
}

#[test]
fn test_url_safe_is_base62_charset() {
    // Mirrors tests.py's URLSafeSerializerMixin.test_is_base62: every
    // character in a dumped token is drawn from the URL-safe alphabet.
    let serializer = SerializerBuilder::new("secret-key")
        .build_url_safe()
        .unwrap();
    let signed = serializer.dumps(&"trust me").unwrap();

    for &byte in &signed {
        assert!(
            byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte == b'.',
            "unexpected byte {byte} in URL-safe token"
        );
    }
}

#[test]
fn test_invalid_base64_does_not_fail_load_payload_panic() {
    // Mirrors tests.py's URLSafeSerializerMixin
    // .test_invalid_base64_does_not_fail_load_payload.
    let serializer = SerializerBuilder::new("aha!").build_url_safe().unwrap();
    let result: Result<String, _> = serializer.load_payload(b"kZ4m3du844lIN");
    assert!(result.is_err());
}

#[test]
fn test_unsafe_load_recovers_tampered_payload() {
    // Mirrors tests.py's SerializerTestCase.test_unsafe_load.
    let serializer = SerializerBuilder::new("secret-key").build().unwrap();
    let mut signed = serializer.dumps(&"string").unwrap();
    let last = signed.len() - 1;
    signed[last] = if signed[last] == b'A' { b'B' } else { b'A' };

    let (valid, value): (bool, Option<String>) = serializer.loads_unsafe(&signed).unwrap();
    assert!(!valid);
    assert_eq!(value, Some("string".to_string()));
}

#[test]
fn test_fallback_key_rotation() {
    let old_serializer = SerializerBuilder::new("old-secret").build().unwrap();
    let signed_with_old_key = old_serializer.dumps(&"still valid").unwrap();

    let rotated_serializer = SerializerBuilder::new("new-secret")
        .add_fallback_signer("old-secret")
        .build()
        .unwrap();

    let value: String = rotated_serializer.loads(&signed_with_old_key).unwrap();
    assert_eq!(value, "still valid");
}
