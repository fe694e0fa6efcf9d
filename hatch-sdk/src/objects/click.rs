//! Click events posted by the website tracking script.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /track/click`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickPayload {
    /// Label of the clicked button, e.g. `"Pre-Order Now"`.
    pub button: String,
    /// Client-side timestamp as reported by the browser: epoch millis, an
    /// ISO string or anything else. Only logged.
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub page: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_accepts_any_json() {
        for body in [
            r#"{"button":"Pre-Order Now","timestamp":1767225600000}"#,
            r#"{"button":"Pre-Order Now","timestamp":"2026-01-01T00:00:00Z"}"#,
            r#"{"button":"Pre-Order Now","timestamp":1.5}"#,
            r#"{"button":"Pre-Order Now"}"#,
        ] {
            let payload: ClickPayload = serde_json::from_str(body).unwrap();
            assert_eq!(payload.button, "Pre-Order Now");
        }
    }
}
