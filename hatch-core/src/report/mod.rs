//! Text rendering of reports and alerts.
//!
//! Everything here is a pure function of its inputs; sending is the
//! notifier's job.

mod formatter;
mod html;

pub use formatter::{ReportContext, format_purchase_alert, format_report};
pub use html::escape_html;
