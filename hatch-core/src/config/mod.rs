//! Configuration types for the analytics relay.
//!
//! These types represent the validated runtime configuration. The actual
//! config loading/parsing is handled by the server crate.

mod access;
mod admin;
mod config_store;
mod report;
mod server;
mod stripe;
mod telegram;

pub use access::AccessConfig;
pub use admin::AdminConfig;
pub use config_store::{ConfigStore, ConfigWatcher};
pub use report::{DEFAULT_TIMEZONE, DEFAULT_TITLE, ReportConfig};
pub use server::ServerConfig;
pub use stripe::StripeConfig;
pub use telegram::{DEFAULT_API_BASE, TelegramConfig};

/// Reloadable configuration, one store per section.
///
/// Each section can be swapped independently on SIGHUP; processors that care
/// about changes subscribe to their section.
#[derive(Clone)]
pub struct SharedConfig {
    pub telegram: ConfigStore<TelegramConfig>,
    pub stripe: ConfigStore<StripeConfig>,
    pub report: ConfigStore<ReportConfig>,
    pub access: ConfigStore<AccessConfig>,
}

impl SharedConfig {
    pub fn new(
        telegram: TelegramConfig,
        stripe: StripeConfig,
        report: ReportConfig,
        access: AccessConfig,
    ) -> Self {
        Self {
            telegram: ConfigStore::new(telegram),
            stripe: ConfigStore::new(stripe),
            report: ConfigStore::new(report),
            access: ConfigStore::new(access),
        }
    }
}
