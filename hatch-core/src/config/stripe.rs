//! Stripe webhook configuration.

use hatch_sdk::signature::DEFAULT_TOLERANCE;

#[derive(Clone)]
pub struct StripeConfig {
    /// Endpoint signing secret (`whsec_...`) as raw bytes.
    pub webhook_secret: Option<Box<[u8]>>,
    /// Maximum signature age in seconds.
    pub tolerance_secs: i64,
    /// Accept unsigned events when no secret is configured. Development only.
    pub allow_unsigned: bool,
}

impl StripeConfig {
    pub fn new(webhook_secret: Option<String>, tolerance_secs: i64, allow_unsigned: bool) -> Self {
        Self {
            webhook_secret: webhook_secret.map(|s| s.into_bytes().into_boxed_slice()),
            tolerance_secs,
            allow_unsigned,
        }
    }

    /// Get the secret key bytes for HMAC verification.
    pub fn secret_bytes(&self) -> Option<&[u8]> {
        self.webhook_secret.as_deref()
    }
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            tolerance_secs: DEFAULT_TOLERANCE,
            allow_unsigned: false,
        }
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "<redacted>"),
            )
            .field("tolerance_secs", &self.tolerance_secs)
            .field("allow_unsigned", &self.allow_unsigned)
            .finish()
    }
}
