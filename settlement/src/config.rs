//! Configuration for settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Ledger configuration
    pub ledger: splitledger_core::Config,

    /// Netting configuration
    pub netting: NettingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "splitledger-settlement".to_string(),
            ledger: splitledger_core::Config::default(),
            netting: NettingConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Balances within ±threshold of zero count as settled
    pub settled_threshold: Decimal,

    /// Decimal places balances and payments are rounded to
    pub decimal_places: u32,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            settled_threshold: Decimal::new(1, 2), // 0.01
            decimal_places: 2,
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
    ///
    /// `SPLITLEDGER_DECIMAL_PLACES` sets the precision of both the ledger and
    /// the netting engine.
    pub fn apply_env(&mut self) -> crate::Result<()> {
        self.ledger.apply_env()?;
        if std::env::var_os("SPLITLEDGER_DECIMAL_PLACES").is_some() {
            self.netting.decimal_places = self.ledger.decimal_places;
        }

        if let Ok(threshold) = std::env::var("SPLITLEDGER_SETTLED_THRESHOLD") {
            self.netting.settled_threshold = Decimal::from_str(threshold.trim()).map_err(|e| {
                crate::Error::Config(format!("Invalid SPLITLEDGER_SETTLED_THRESHOLD: {}", e))
            })?;
        }

        self.validate()
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        self.ledger.validate()?;

        if self.netting.settled_threshold.is_sign_negative() {
            return Err(crate::Error::Config(format!(
                "settled_threshold must not be negative, got {}",
                self.netting.settled_threshold
            )));
        }
        if self.netting.decimal_places > splitledger_core::config::MAX_DECIMAL_PLACES {
            return Err(crate::Error::Config(format!(
                "netting.decimal_places must be at most {}, got {}",
                splitledger_core::config::MAX_DECIMAL_PLACES,
                self.netting.decimal_places
            )));
        }
        if self.netting.decimal_places != self.ledger.decimal_places {
            return Err(crate::Error::Config(format!(
                "netting.decimal_places ({}) must match ledger.decimal_places ({})",
                self.netting.decimal_places, self.ledger.decimal_places
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

    const ENV_VARS: [&str; 4] = [
        "SPLITLEDGER_AMOUNT_TOLERANCE",
        "SPLITLEDGER_DECIMAL_PLACES",
        "SPLITLEDGER_METRICS_ENABLED",
        "SPLITLEDGER_SETTLED_THRESHOLD",
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
        assert_eq!(config.service_name, "splitledger-settlement");
        assert_eq!(config.netting.settled_threshold, Decimal::new(1, 2));
        assert_eq!(config.netting.decimal_places, 2);
        assert_eq!(config.ledger.decimal_places, 2);
    }

    #[test]
    fn test_from_file_nested() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "service_name = \"trip\"").unwrap();
        writeln!(file, "[ledger]").unwrap();
        writeln!(file, "amount_tolerance = \"0.05\"").unwrap();
        writeln!(file, "[netting]").unwrap();
        writeln!(file, "settled_threshold = \"0.10\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.service_name, "trip");
        assert_eq!(config.ledger.amount_tolerance, Decimal::new(5, 2));
        assert_eq!(config.netting.settled_threshold, Decimal::new(10, 2));
        assert_eq!(config.netting.decimal_places, 2);
    }

    #[test]
    fn test_invalid_nested_ledger_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]").unwrap();
        writeln!(file, "amount_tolerance = \"-1\"").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), "config");
    }

    #[test]
    fn test_mismatched_decimal_places_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ledger]").unwrap();
        writeln!(file, "decimal_places = 3").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert_eq!(err.code(), "config");

        writeln!(file, "[netting]").unwrap();
        writeln!(file, "decimal_places = 3").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.netting.decimal_places, 3);
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(
            &[
                ("SPLITLEDGER_AMOUNT_TOLERANCE", "0.02"),
                ("SPLITLEDGER_SETTLED_THRESHOLD", "0.05"),
            ],
            Config::from_env,
        )
        .unwrap();
        assert_eq!(config.ledger.amount_tolerance, Decimal::new(2, 2));
        assert_eq!(config.netting.settled_threshold, Decimal::new(5, 2));
        assert_eq!(config.netting.decimal_places, 2);
    }

    #[test]
    fn test_env_decimal_places_applies_to_netting() {
        let config = with_env(&[("SPLITLEDGER_DECIMAL_PLACES", "4")], Config::from_env).unwrap();
        assert_eq!(config.ledger.decimal_places, 4);
        assert_eq!(config.netting.decimal_places, 4);
    }

    #[test]
    fn test_env_invalid_values() {
        let err = with_env(&[("SPLITLEDGER_SETTLED_THRESHOLD", "cheap")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = with_env(&[("SPLITLEDGER_SETTLED_THRESHOLD", "-1")], Config::from_env)
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));

        let err = with_env(&[("SPLITLEDGER_DECIMAL_PLACES", "40")], Config::from_env)
            .unwrap_err();
        assert_eq!(err.code(), "config");

        let err = with_env(&[("SPLITLEDGER_AMOUNT_TOLERANCE", "x")], Config::from_env)
            .unwrap_err();
        assert_eq!(err.code(), "config");
    }
}
