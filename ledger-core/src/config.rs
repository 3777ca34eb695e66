//! Configuration for the ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound on `decimal_places`
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Largest accepted |total - Σ(splits)| for an expense
    pub amount_tolerance: Decimal,

    /// Decimal places balances are rounded to
    pub decimal_places: u32,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "splitledger".to_string(),
            amount_tolerance: Decimal::new(1, 2), // 0.01
            decimal_places: 2,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Collect metrics
    pub enabled: bool,

    /// Prefix for every metric name
    pub namespace: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: "splitledger".to_string(),
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(tolerance) = std::env::var("SPLITLEDGER_AMOUNT_TOLERANCE") {
            self.amount_tolerance = Decimal::from_str(tolerance.trim()).map_err(|e| {
                crate::Error::Config(format!("Invalid SPLITLEDGER_AMOUNT_TOLERANCE: {}", e))
            })?;
        }

        if let Ok(places) = std::env::var("SPLITLEDGER_DECIMAL_PLACES") {
            self.decimal_places = places.trim().parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SPLITLEDGER_DECIMAL_PLACES: {}", e))
            })?;
        }

        if let Ok(enabled) = std::env::var("SPLITLEDGER_METRICS_ENABLED") {
            self.metrics.enabled = enabled.trim().parse().map_err(|e| {
                crate::Error::Config(format!("Invalid SPLITLEDGER_METRICS_ENABLED: {}", e))
            })?;
        }

        self.validate()
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.amount_tolerance.is_sign_negative() {
            return Err(crate::Error::Config(format!(
                "amount_tolerance must not be negative, got {}",
                self.amount_tolerance
            )));
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(crate::Error::Config(format!(
                "decimal_places must be at most {}, got {}",
                MAX_DECIMAL_PLACES, self.decimal_places
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

    const ENV_VARS: [&str; 3] = [
        "SPLITLEDGER_AMOUNT_TOLERANCE",
        "SPLITLEDGER_DECIMAL_PLACES",
        "SPLITLEDGER_METRICS_ENABLED",
    ];

    /// Run `f` with exactly `vars` set among the SPLITLEDGER_* variables
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock();
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
        for (name, value) in vars {
            std::env::set_var(name, value);
        }
        let result = f();
        for (name, _) in vars {
            std::env::remove_var(name);
        }
        result
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "splitledger");
        assert_eq!(config.amount_tolerance, Decimal::new(1, 2));
        assert_eq!(config.decimal_places, 2);
        assert!(config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decimal_places = 3").unwrap();
        writeln!(file, "amount_tolerance = \"0.005\"").unwrap();
        writeln!(file, "[metrics]").unwrap();
        writeln!(file, "enabled = false").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.decimal_places, 3);
        assert_eq!(config.amount_tolerance, Decimal::new(5, 3));
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.namespace, "splitledger");
        assert_eq!(config.service_name, "splitledger");
    }

    #[test]
    fn test_from_file_rejects_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decimal_places = 40").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_negative_tolerance_invalid() {
        let config = Config {
            amount_tolerance: Decimal::new(-1, 2),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(
            &[
                ("SPLITLEDGER_AMOUNT_TOLERANCE", "0.05"),
                ("SPLITLEDGER_DECIMAL_PLACES", " 3 "),
                ("SPLITLEDGER_METRICS_ENABLED", "false"),
            ],
            Config::from_env,
        )
        .unwrap();
        assert_eq!(config.amount_tolerance, Decimal::new(5, 2));
        assert_eq!(config.decimal_places, 3);
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn test_env_unset_keeps_defaults() {
        let config = with_env(&[], Config::from_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_unparsable_value() {
        let err = with_env(&[("SPLITLEDGER_AMOUNT_TOLERANCE", "a lot")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = with_env(&[("SPLITLEDGER_METRICS_ENABLED", "maybe")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_env_out_of_range_value() {
        let err = with_env(&[("SPLITLEDGER_DECIMAL_PLACES", "40")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = with_env(&[("SPLITLEDGER_AMOUNT_TOLERANCE", "-0.01")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
