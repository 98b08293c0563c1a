//! ShopFast configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFAST_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFAST_PORT` - Listen port (default: 3000)
//! - `SHOPFAST_ENV` - Environment name reported by `/health` (default: development)
//! - `SHOPFAST_CONFIRMATION_DELAY_MS` - Delay before a pending order is confirmed (default: 1000)
//! - `SHOPFAST_PAYMENT_LATENCY_MS` - Simulated payment gateway latency (default: 200-1000)
//! - `SHOPFAST_PROCESSING_TIME_MS` - Cosmetic processing time reported on checkout (default: 500-1500)
//! - `SHOPFAST_TOTALS_LATENCY_MS` - Simulated totals calculation latency (default: 100-400)
//! - `SHOPFAST_FEATURED_LATENCY_MS` - Simulated featured products query latency (default: 50-250)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//!
//! Latency values are millisecond ranges written `min-max`; a single number
//! means a fixed delay.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::services::latency::Latency;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// ShopFast application configuration.
#[derive(Debug, Clone)]
pub struct ShopFastConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Environment name (development, staging, production)
    pub environment: String,
    /// Simulated latencies and the order confirmation delay
    pub timing: TimingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Artificial delays used to mimic payment and database latency.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// How long an order stays `pending` before it is confirmed.
    pub confirmation_delay: Duration,
    /// Latency between checkout validation and order creation.
    pub payment: Latency,
    /// Display-only processing time attached to checkout responses.
    pub processing_time: Latency,
    /// Latency of the totals estimate.
    pub totals: Latency,
    /// Latency of the featured products listing.
    pub featured: Latency,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            confirmation_delay: Duration::from_millis(1000),
            payment: Latency::between_ms(200, 1000),
            processing_time: Latency::between_ms(500, 1500),
            totals: Latency::between_ms(100, 400),
            featured: Latency::between_ms(50, 250),
        }
    }
}

impl TimingConfig {
    /// No simulated latency and a short confirmation delay.
    #[must_use]
    pub const fn immediate(confirmation_delay: Duration) -> Self {
        Self {
            confirmation_delay,
            payment: Latency::none(),
            processing_time: Latency::none(),
            totals: Latency::none(),
            featured: Latency::none(),
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let confirmation_delay = match get_optional_env("SHOPFAST_CONFIRMATION_DELAY_MS") {
            Some(raw) => Duration::from_millis(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "SHOPFAST_CONFIRMATION_DELAY_MS".to_string(),
                    e.to_string(),
                )
            })?),
            None => defaults.confirmation_delay,
        };

        Ok(Self {
            confirmation_delay,
            payment: get_latency("SHOPFAST_PAYMENT_LATENCY_MS", defaults.payment)?,
            processing_time: get_latency("SHOPFAST_PROCESSING_TIME_MS", defaults.processing_time)?,
            totals: get_latency("SHOPFAST_TOTALS_LATENCY_MS", defaults.totals)?,
            featured: get_latency("SHOPFAST_FEATURED_LATENCY_MS", defaults.featured)?,
        })
    }
}

impl ShopFastConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHOPFAST_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFAST_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHOPFAST_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFAST_PORT".to_string(), e.to_string()))?;
        let environment = get_env_or_default("SHOPFAST_ENV", "development");
        let timing = TimingConfig::from_env()?;

        Ok(Self {
            host,
            port,
            environment,
            timing,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Configuration for tests: loopback, ephemeral port, no simulated latency.
    #[must_use]
    pub fn for_tests(confirmation_delay: Duration) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
            environment: "test".to_string(),
            timing: TimingConfig::immediate(confirmation_delay),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

/// Get a latency range, falling back to `default` when unset.
fn get_latency(key: &str, default: Latency) -> Result<Latency, ConfigError> {
    match get_optional_env(key) {
        Some(raw) => parse_latency(&raw)
            .map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason)),
        None => Ok(default),
    }
}

/// Parse `"200-1000"` or `"250"` into a millisecond latency range.
fn parse_latency(raw: &str) -> Result<Latency, String> {
    let parse = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|e| format!("'{}': {e}", s.trim()))
    };

    let (min, max) = match raw.split_once('-') {
        Some((min, max)) => (parse(min)?, parse(max)?),
        None => {
            let fixed = parse(raw)?;
            (fixed, fixed)
        }
    };

    if min > max {
        return Err(format!("range start {min} is greater than end {max}"));
    }
    Ok(Latency::between_ms(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latency_range() {
        assert_eq!(parse_latency("200-1000"), Ok(Latency::between_ms(200, 1000)));
        assert_eq!(parse_latency(" 5 - 10 "), Ok(Latency::between_ms(5, 10)));
    }

    #[test]
    fn test_parse_latency_fixed() {
        assert_eq!(parse_latency("250"), Ok(Latency::between_ms(250, 250)));
        assert_eq!(parse_latency("0"), Ok(Latency::none()));
    }

    #[test]
    fn test_parse_latency_invalid() {
        assert!(parse_latency("fast").is_err());
        assert!(parse_latency("10-5").is_err());
        assert!(parse_latency("-5").is_err());
    }

    #[test]
    fn test_default_timing_matches_documented_values() {
        let timing = TimingConfig::default();
        assert_eq!(timing.confirmation_delay, Duration::from_millis(1000));
        assert_eq!(timing.payment, Latency::between_ms(200, 1000));
        assert_eq!(timing.totals, Latency::between_ms(100, 400));
        assert_eq!(timing.featured, Latency::between_ms(50, 250));
    }

    #[test]
    fn test_for_tests_binds_ephemeral_loopback() {
        let config = ShopFastConfig::for_tests(Duration::from_millis(5));
        assert_eq!(config.socket_addr().port(), 0);
        assert!(config.socket_addr().ip().is_loopback());
        assert_eq!(config.timing.payment, Latency::none());
    }
}
