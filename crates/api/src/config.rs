//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use domain::QuantityLimits;
use domain::cart::DEFAULT_MAX_PER_ADD;

use crate::sessions::{DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS};

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CART_MAX_QUANTITY`: largest quantity one add-to-cart accepts (default: `10`)
/// - `SESSION_DIR`: directory for persisted sessions; unset keeps sessions in memory
/// - `SESSION_IDLE_SECS`: seconds an unused session stays in memory (default: `1800`)
/// - `MAX_SESSIONS`: sessions kept in memory at once (default: `10000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_quantity: u32,
    pub session_dir: Option<PathBuf>,
    pub session_idle_timeout: Duration,
    pub max_sessions: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            max_quantity: lookup("CART_MAX_QUANTITY")
                .and_then(|q| q.parse().ok())
                .filter(|q| *q > 0)
                .unwrap_or(defaults.max_quantity),
            session_dir: lookup("SESSION_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
            session_idle_timeout: lookup("SESSION_IDLE_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_timeout),
            max_sessions: lookup("MAX_SESSIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_sessions),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the per-add quantity bounds for carts.
    pub fn quantity_limits(&self) -> QuantityLimits {
        QuantityLimits::new(self.max_quantity)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            max_quantity: DEFAULT_MAX_PER_ADD,
            session_dir: None,
            session_idle_timeout: DEFAULT_IDLE_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}
