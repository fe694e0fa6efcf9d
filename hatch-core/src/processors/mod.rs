//! Background processors.
//!
//! - `Reporter`: Receives `ReportTrigger`, snapshots counters, notifies
//! - `ReportScheduler`: Emits `ReportTrigger::Scheduled` at every local :00
//! - `PurchaseAlerter`: Receives `Purchase`, sends an immediate alert

pub mod purchase_alerts;
pub mod reporter;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use purchase_alerts::PurchaseAlerter;
pub use reporter::Reporter;
pub use scheduler::ReportScheduler;
