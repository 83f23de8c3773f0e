use crate::base62;
use crate::clock;
use crate::error::{BadTimeSignature, LoadError, SignatureExpired};
use crate::signer::Signer;
use crate::EPOCH;

/// Extends a [`Signer`] with a base62-encoded signing timestamp, so a
/// verifier can reject a token that is still correctly signed but too old.
///
/// Borrows its inner [`Signer`] rather than owning it, so a caller who
/// already has one `Signer` can wrap it in a `TimestampSigner` on demand
/// without duplicating the derived key.
///
/// The clock is injected rather than read from a global, so tests can pin
/// "now" without any process-wide state. [`TimestampSigner::new`] uses the
/// system clock; [`TimestampSigner::with_clock`] takes any `Fn() -> u64`.
///
/// # Basic usage
/// ```rust
/// use itsdangerous::{default_builder, TimestampSigner};
///
/// let signer = default_builder("secret key").build().unwrap();
/// let timestamp_signer = TimestampSigner::new(&signer);
/// let signed = timestamp_signer.sign("hello world!");
/// let (value, _date_signed) = timestamp_signer.unsign(&signed, None, 2_000_000_000).unwrap();
/// assert_eq!(value, b"hello world!");
/// ```
pub struct TimestampSigner<'a, Clock = fn() -> u64>
where
    Clock: Fn() -> u64,
{
    signer: &'a Signer,
    clock: Clock,
}

impl<'a> TimestampSigner<'a, fn() -> u64> {
    /// Wraps `signer`, reading the system clock on every [`sign`](Self::sign) call.
    pub fn new(signer: &'a Signer) -> Self {
        Self {
            signer,
            clock: clock::now,
        }
    }
}

impl<'a, Clock> TimestampSigner<'a, Clock>
where
    Clock: Fn() -> u64,
{
    /// Wraps `signer` with an injected clock, for deterministic tests.
    pub fn with_clock(signer: &'a Signer, clock: Clock) -> Self {
        Self { signer, clock }
    }

    /// Signs `value` with the current time, read exactly once from this
    /// signer's clock.
    pub fn sign(&self, value: impl AsRef<[u8]>) -> Vec<u8> {
        let now = (self.clock)();
        self.sign_at(value, now)
    }

    /// Signs `value` with an explicit `now`, bypassing the clock entirely.
    /// This is the entry point tests should use instead of pinning a
    /// global clock.
    pub fn sign_at(&self, value: impl AsRef<[u8]>, now: u64) -> Vec<u8> {
        let elapsed = now.saturating_sub(EPOCH);
        let encoded_timestamp = base62::encode(elapsed);
        let value = value.as_ref();

        let mut payload =
            Vec::with_capacity(value.len() + 1 + encoded_timestamp.len());
        payload.extend_from_slice(value);
        payload.push(self.signer.separator().as_byte());
        payload.extend_from_slice(encoded_timestamp.as_bytes());

        self.signer.sign(payload)
    }

    /// Verifies `signed`, recovers its timestamp, and (if `max_age` is
    /// given) rejects it as expired when older than `max_age` seconds as
    /// measured against `now`. A negative `max_age` always expires.
    ///
    /// Returns the original value and the absolute signing time in
    /// seconds since the Unix epoch.
    pub fn unsign<'b>(
        &self,
        signed: &'b [u8],
        max_age: Option<i64>,
        now: u64,
    ) -> Result<(&'b [u8], u64), LoadError> {
        let timestamped_value = self.signer.unsign(signed).map_err(|err| {
            // `err.payload` is `value || sep || ts`; strip the timestamp
            // segment so the recovered payload matches what `load_payload`
            // expects, same as the other `BadTimeSignature` paths below.
            let stripped = err
                .payload
                .as_deref()
                .and_then(|timestamped| self.signer.separator().rsplit(timestamped).ok())
                .map(|(value, _ts)| value.to_vec());
            BadTimeSignature::from_bad_signature(err.kind, stripped.or(err.payload))
        })?;

        let (value, encoded_timestamp) = self
            .signer
            .separator()
            .rsplit(timestamped_value)
            .map_err(|_| BadTimeSignature::timestamp_missing(timestamped_value))?;

        let elapsed = base62::decode(encoded_timestamp)
            .ok_or_else(|| BadTimeSignature::timestamp_malformed(value))?;
        let date_signed = EPOCH + elapsed;

        if let Some(max_age) = max_age {
            let age = now as i64 - date_signed as i64;
            if age > max_age {
                return Err(SignatureExpired {
                    payload: Some(value.to_vec()),
                    date_signed,
                    age,
                    max_age,
                }
                .into());
            }
        }

        Ok((value, date_signed))
    }
}
