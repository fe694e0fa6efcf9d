//! Scan events posted by the QR code generator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /webhook/qr`.
///
/// The generator posts either JSON or a urlencoded form, and not every plan
/// includes geo or device data, so every field is optional. The code
/// identifiers are only logged and are kept as whatever JSON the generator
/// sent (some plans send numeric ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QrScanPayload {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, alias = "device")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub short_url: Option<Value>,
    #[serde(default)]
    pub qr_code_id: Option<Value>,
}

impl QrScanPayload {
    /// Identifier of the scanned code, whichever field the generator filled.
    pub fn code_id(&self) -> Option<String> {
        [&self.short_url, &self.qr_code_id]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_generator_payload() {
        let payload: QrScanPayload = serde_json::from_str(
            r#"{"country":"US","device":"mobile","qr_code_id":"q-1","extra":true}"#,
        )
        .unwrap();
        assert_eq!(payload.country.as_deref(), Some("US"));
        assert_eq!(payload.device_type.as_deref(), Some("mobile"));
        assert_eq!(payload.code_id().as_deref(), Some("q-1"));
    }

    #[test]
    fn test_accepts_numeric_code_id() {
        let payload: QrScanPayload =
            serde_json::from_str(r#"{"qr_code_id":12345,"short_url":null}"#).unwrap();
        assert_eq!(payload.code_id().as_deref(), Some("12345"));

        let payload: QrScanPayload = serde_json::from_str(r#"{"country":"US"}"#).unwrap();
        assert_eq!(payload.code_id(), None);
    }
}
