//! Server location and transport settings.

use crate::network::application::http::FramingLimits;
use crate::network::tcp::{AddressFamily, SocketOptions};

/// Address of the public library server.
pub const DEFAULT_HOST: &str = "34.254.242.81";
/// Port of the public library server.
pub const DEFAULT_PORT: u16 = 8080;

/// Everything the dispatcher needs to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Literal IP address; also sent as the `HOST` header.
    pub host: String,
    pub port: u16,
    pub family: AddressFamily,
    pub socket: SocketOptions,
    pub limits: FramingLimits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            family: AddressFamily::Inet,
            socket: SocketOptions::default(),
            limits: FramingLimits::default(),
        }
    }
}

impl ServerConfig {
    /// `ip:port` form understood by [`Connect`](crate::network::Connect).
    pub fn remote(&self) -> String {
        match self.family {
            AddressFamily::Inet => format!("{}:{}", self.host, self.port),
            AddressFamily::Inet6 => format!("[{}]:{}", self.host, self.port),
        }
    }
}
