//! Shared keys for the inbound endpoints.

use super::AdminConfig;
use subtle::ConstantTimeEq;

/// Optional shared secrets checked by the HTTP extractors.
#[derive(Debug, Clone, Default)]
pub struct AccessConfig {
    /// When set, `/webhook/qr` must carry this value in `X-Api-Key`.
    pub qr_api_key: Option<String>,
    pub admin: AdminConfig,
}

impl AccessConfig {
    /// Check a provided QR key. Open endpoints accept anything.
    pub fn qr_key_matches(&self, provided: Option<&str>) -> bool {
        match (self.qr_api_key.as_deref(), provided) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(expected), Some(provided)) => {
                provided.as_bytes().ct_eq(expected.as_bytes()).into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_key_matching() {
        let open = AccessConfig::default();
        assert!(open.qr_key_matches(None));

        let locked = AccessConfig {
            qr_api_key: Some("k-123".to_string()),
            ..Default::default()
        };
        assert!(locked.qr_key_matches(Some("k-123")));
        assert!(!locked.qr_key_matches(Some("k-124")));
        assert!(!locked.qr_key_matches(Some("k-1234")));
        assert!(!locked.qr_key_matches(None));
    }
}
