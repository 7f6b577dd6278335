//! Configuration loader for the `agro-health` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Every variable is optional; a value that is present
//! but malformed is a startup error rather than a silent fallback.
//!
use std::{env, net::SocketAddr, time::Duration};

use anyhow::{anyhow, Result};

use crate::dispatcher::{DispatchMode, DEFAULT_COOLDOWN};

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($lookup:expr, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// HTTP listen address.
    pub bind_addr: SocketAddr,

    /// Minimum interval between repeats of the same live alert.
    pub alert_cooldown: Duration,

    /// Whether same-severity alerts are summarized into one notification.
    pub dispatch_mode: DispatchMode,

    /// Upper bound on readings accepted by one report request.
    pub report_max_readings: usize,
}

impl Default for Config {
    fn default() -> Self {
        // ---
        Config {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            alert_cooldown: DEFAULT_COOLDOWN,
            dispatch_mode: DispatchMode::Grouped,
            report_max_readings: 10_000,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `AGRO_BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `ALERT_COOLDOWN_SECS` – alert cooldown window (default: 300)
/// - `ALERT_GROUPING` – `grouped` or `individual` (default: `grouped`)
/// - `REPORT_MAX_READINGS` – readings accepted per report (default: 10000)
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    // ---
    let defaults = Config::default();

    let bind_addr = parse_env!(lookup, "AGRO_BIND_ADDR", SocketAddr, defaults.bind_addr);
    let cooldown_secs = parse_env!(
        lookup,
        "ALERT_COOLDOWN_SECS",
        u64,
        defaults.alert_cooldown.as_secs()
    );
    let dispatch_mode = parse_env!(lookup, "ALERT_GROUPING", DispatchMode, defaults.dispatch_mode);
    let report_max_readings = parse_env!(
        lookup,
        "REPORT_MAX_READINGS",
        usize,
        defaults.report_max_readings
    );

    if report_max_readings == 0 {
        return Err(anyhow!("REPORT_MAX_READINGS must be at least 1"));
    }

    Ok(Config {
        bind_addr,
        alert_cooldown: Duration::from_secs(cooldown_secs),
        dispatch_mode,
        report_max_readings,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  AGRO_BIND_ADDR      : {}", self.bind_addr);
        tracing::info!("  ALERT_COOLDOWN_SECS : {}", self.alert_cooldown.as_secs());
        tracing::info!("  ALERT_GROUPING      : {:?}", self.dispatch_mode);
        tracing::info!("  REPORT_MAX_READINGS : {}", self.report_max_readings);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        // ---
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_from(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        // ---
        let cfg = load(&[]).unwrap();

        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.alert_cooldown, Duration::from_secs(300));
        assert_eq!(cfg.dispatch_mode, DispatchMode::Grouped);
        assert_eq!(cfg.report_max_readings, 10_000);
    }

    #[test]
    fn test_overrides() {
        // ---
        let cfg = load(&[
            ("AGRO_BIND_ADDR", "127.0.0.1:9000"),
            ("ALERT_COOLDOWN_SECS", "60"),
            ("ALERT_GROUPING", "individual"),
            ("REPORT_MAX_READINGS", "500"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.alert_cooldown, Duration::from_secs(60));
        assert_eq!(cfg.dispatch_mode, DispatchMode::Individual);
        assert_eq!(cfg.report_max_readings, 500);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        // ---
        let err = load(&[("ALERT_COOLDOWN_SECS", "five minutes")]).unwrap_err();
        assert!(err.to_string().contains("ALERT_COOLDOWN_SECS"));

        assert!(load(&[("ALERT_GROUPING", "batched")]).is_err());
        assert!(load(&[("REPORT_MAX_READINGS", "0")]).is_err());
    }
}
