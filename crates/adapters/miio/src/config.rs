//! miIO adapter configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::error::MiioError;
use crate::packet::Token;

/// Default UDP port of miIO devices.
pub const DEFAULT_PORT: u16 = 54321;

/// Number of discovery attempts made before giving up on a device.
pub const DISCOVERY_ATTEMPTS: u32 = 3;

/// Connection parameters for a live vacuum.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MiioConfig {
    /// `ip:port` of the device.
    pub address: String,
    /// 32 hex digit device token.
    pub token: String,
    /// Per-datagram reply timeout, in milliseconds.
    pub timeout_ms: u64,
}

impl MiioConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse the configured device token.
    ///
    /// # Errors
    ///
    /// Returns [`MiioError::InvalidToken`] unless `token` is 32 hex digits.
    pub fn token(&self) -> Result<Token, MiioError> {
        Token::from_hex(&self.token)
    }

    /// Whether `token` is a usable device token.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.token().is_ok()
    }
}

impl Default for MiioConfig {
    fn default() -> Self {
        Self {
            address: format!("192.168.1.50:{DEFAULT_PORT}"),
            token: String::new(),
            timeout_ms: 5000,
        }
    }
}
