//! Stripe webhook signature algorithm and verification.
//!
//! Stripe signs every webhook delivery with HMAC-SHA256. The wire format for
//! the header is:
//!
//! ```text
//! Stripe-Signature: t={unix_timestamp},v1={hex_signature}[,v1={hex_signature}...]
//! ```
//!
//! The signed data is `"{timestamp}.{raw_body}"`, keyed with the endpoint
//! secret (`whsec_...`) taken as raw bytes. Several `v1` entries may be present
//! while a secret is being rolled; any one of them matching is enough. Other
//! schemes (`v0`, test-mode signatures) are ignored.

/// Header name carrying the Stripe signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Default maximum allowed age of a signature (in seconds).
pub const DEFAULT_TOLERANCE: i64 = 5 * 60;

const SCHEME: &str = "v1";

/// Errors produced by signature operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid header format")]
    InvalidFormat,
    #[error("no v1 signature found in header")]
    NoSignatures,
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("signature expired")]
    Expired,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

/// A parsed `Stripe-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSignature {
    pub timestamp: i64,
    pub signatures: Vec<Box<[u8]>>,
}

impl StripeSignature {
    /// Parse a raw `Stripe-Signature` header value.
    ///
    /// `v1` entries that are not valid hex are skipped; they can never match.
    pub fn parse(value: &str) -> Result<Self, SignatureError> {
        let mut timestamp = None;
        let mut signatures = Vec::new();

        for item in value.split(',') {
            let (key, val) = item
                .trim()
                .split_once('=')
                .ok_or(SignatureError::InvalidFormat)?;
            match key {
                "t" => {
                    let parsed = val
                        .parse::<i64>()
                        .map_err(|_| SignatureError::InvalidFormat)?;
                    timestamp = Some(parsed);
                }
                SCHEME => {
                    if let Ok(bytes) = hex::decode(val) {
                        signatures.push(bytes.into_boxed_slice());
                    }
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureError::InvalidFormat)?;
        if signatures.is_empty() {
            return Err(SignatureError::NoSignatures);
        }
        Ok(Self {
            timestamp,
            signatures,
        })
    }

    /// Verify the raw request body against this header.
    ///
    /// The HMAC is checked before the timestamp so that a forged header never
    /// learns anything about the tolerance window.
    pub fn verify(
        &self,
        payload: &[u8],
        secret: &[u8],
        now: i64,
        tolerance: i64,
    ) -> Result<(), SignatureError> {
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret);
        let data = signed_data(self.timestamp, payload);
        let matched = self
            .signatures
            .iter()
            .any(|sig| ring::hmac::verify(&key, &data, sig).is_ok());
        if !matched {
            return Err(SignatureError::SignatureMismatch);
        }
        check_timestamp(self.timestamp, now, tolerance)
    }
}

/// Verify a webhook delivery from its raw body, header value and secret.
///
/// Returns the signed timestamp on success. This is a pure function: the
/// caller supplies the current unix time.
pub fn verify_signature(
    payload: &[u8],
    header_value: &str,
    secret: &[u8],
    now: i64,
    tolerance: i64,
) -> Result<i64, SignatureError> {
    let parsed = StripeSignature::parse(header_value)?;
    parsed.verify(payload, secret, now, tolerance)?;
    Ok(parsed.timestamp)
}

/// Compute a `Stripe-Signature` header value for `payload`.
///
/// Used by tests and local tooling to produce deliveries Stripe would accept.
pub fn sign_payload(payload: &[u8], secret: &[u8], timestamp: i64) -> String {
    let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret);
    let tag = ring::hmac::sign(&key, &signed_data(timestamp, payload));
    format!("t={timestamp},{SCHEME}={}", hex::encode(tag.as_ref()))
}

fn signed_data(timestamp: i64, payload: &[u8]) -> Vec<u8> {
    let prefix = format!("{timestamp}.");
    let mut data = Vec::with_capacity(prefix.len() + payload.len());
    data.extend_from_slice(prefix.as_bytes());
    data.extend_from_slice(payload);
    data
}

// ---------------------------------------------------------------------------
// Timestamp validation
// ---------------------------------------------------------------------------

/// Check that a signature timestamp is no older than `tolerance` seconds.
pub fn check_timestamp(timestamp: i64, now: i64, tolerance: i64) -> Result<(), SignatureError> {
    if now - timestamp > tolerance {
        return Err(SignatureError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"whsec_test_secret";
    const BODY: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed"}"#;
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_signed_payload_verifies() {
        let header = sign_payload(BODY, SECRET, NOW);
        assert_eq!(
            verify_signature(BODY, &header, SECRET, NOW + 10, DEFAULT_TOLERANCE),
            Ok(NOW)
        );
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let header = sign_payload(BODY, b"whsec_other", NOW);
        assert_eq!(
            verify_signature(BODY, &header, SECRET, NOW, DEFAULT_TOLERANCE),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_tampered_body_is_rejected() {
        let header = sign_payload(BODY, SECRET, NOW);
        let tampered = br#"{"id":"evt_1","type":"checkout.session.expired"}"#;
        assert_eq!(
            verify_signature(tampered, &header, SECRET, NOW, DEFAULT_TOLERANCE),
            Err(SignatureError::SignatureMismatch)
        );
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let header = sign_payload(BODY, SECRET, NOW);
        assert_eq!(
            verify_signature(BODY, &header, SECRET, NOW + 301, DEFAULT_TOLERANCE),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn test_any_matching_v1_entry_is_accepted() {
        let good = sign_payload(BODY, SECRET, NOW);
        let good_sig = good.split_once(",v1=").map(|(_, s)| s).unwrap_or_default();
        let header = format!("t={NOW},v1={},v1={good_sig},v0=deadbeef", "00".repeat(32));
        assert!(verify_signature(BODY, &header, SECRET, NOW, DEFAULT_TOLERANCE).is_ok());
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            StripeSignature::parse("garbage"),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            StripeSignature::parse("t=abc,v1=00"),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            StripeSignature::parse("v1=00ff"),
            Err(SignatureError::InvalidFormat)
        );
        assert_eq!(
            StripeSignature::parse("t=1,v0=00ff"),
            Err(SignatureError::NoSignatures)
        );
        assert_eq!(
            StripeSignature::parse("t=1,v1=not-hex"),
            Err(SignatureError::NoSignatures)
        );
    }
}
