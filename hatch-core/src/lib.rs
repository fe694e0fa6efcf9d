#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod counters;
pub mod events;
pub mod notifier;
pub mod processors;
pub mod report;
pub mod utils;
