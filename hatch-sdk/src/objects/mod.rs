pub mod click;
pub mod money;
pub mod qr;
pub mod stats;
pub mod stripe;

pub use click::ClickPayload;
pub use money::minor_to_major;
pub use qr::QrScanPayload;
pub use stats::{CounterSnapshot, HealthResponse, StatsSnapshot};
pub use stripe::{CHECKOUT_SESSION_COMPLETED, CheckoutSession, CustomerDetails, StripeEvent};
