//! Server configuration.

use std::net::SocketAddr;

/// Settings read once at startup; a reload does not rebind the listener.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Origins allowed to post click events. Empty means any origin.
    pub allowed_origins: Vec<String>,
}
