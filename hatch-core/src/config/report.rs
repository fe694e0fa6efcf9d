//! Report configuration.

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_TITLE: &str = "Delivery Hatch";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Reports fire at the top of each hour in this zone, and times in
    /// messages are rendered in it.
    pub timezone: Tz,
    /// Brand name shown in the report header.
    pub title: String,
    /// Send an immediate message for every completed purchase.
    pub notify_purchases: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            title: DEFAULT_TITLE.to_string(),
            notify_purchases: true,
        }
    }
}
