//! TOML-based ledger configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::ledger::AccountId;

/// Top-level configuration parsed from TOML.
///
/// Every section has defaults, so an empty file is a valid in-memory
/// configuration. Load with [`LedgerConfig::from_toml_file`] or start from
/// [`LedgerConfig::demo`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Persistence settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Log level and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Synthetic feed used by the `simulate` command.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Persistence settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Journal file path; the ledger is in-memory when absent.
    pub journal: Option<PathBuf>,
}

/// Log level and output format.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    /// `"text"` or `"json"`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Synthetic feed parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Number of readings recorded per household (must be > 0).
    pub steps: usize,
    /// Steps per simulated day, used for the daily profiles (must be > 0).
    pub steps_per_day: usize,
    /// Master random seed.
    pub seed: u64,
    /// Households feeding the ledger.
    pub households: Vec<HouseholdConfig>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            steps: 24,
            steps_per_day: 24,
            seed: 42,
            households: vec![HouseholdConfig::default()],
        }
    }
}

/// One household: a rooftop solar array plus a daily consumption profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HouseholdConfig {
    /// Ledger account the readings are recorded under.
    pub account: String,
    /// Peak solar production per step (Wh).
    pub peak_wh: f64,
    /// First daylight step (inclusive).
    pub sunrise_step: usize,
    /// Last daylight step (exclusive).
    pub sunset_step: usize,
    /// Mean consumption per step (Wh).
    pub base_wh: f64,
    /// Amplitude of the daily consumption swing (Wh).
    pub swing_wh: f64,
    /// Relative noise standard deviation applied to both profiles.
    pub noise_std: f64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            account: "house-1".to_string(),
            peak_wh: 5000.0,
            sunrise_step: 6,
            sunset_step: 18,
            base_wh: 800.0,
            swing_wh: 700.0,
            noise_std: 0.05,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"feed.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl LedgerConfig {
    /// Single household, one day, in-memory.
    pub fn demo() -> Self {
        Self::default()
    }

    /// Four households with different array sizes and habits over two days.
    pub fn neighbourhood() -> Self {
        let house = |account: &str, peak_wh: f64, base_wh: f64, swing_wh: f64| HouseholdConfig {
            account: account.to_string(),
            peak_wh,
            base_wh,
            swing_wh,
            ..HouseholdConfig::default()
        };
        Self {
            feed: FeedConfig {
                steps: 48,
                households: vec![
                    house("house-1", 5000.0, 800.0, 700.0),
                    house("house-2", 8000.0, 1200.0, 600.0),
                    house("house-3", 0.0, 600.0, 400.0),
                    HouseholdConfig {
                        sunrise_step: 5,
                        sunset_step: 20,
                        noise_std: 0.1,
                        ..house("house-4", 12000.0, 1500.0, 900.0)
                    },
                ],
                ..FeedConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "neighbourhood"];

    /// Loads a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "neighbourhood" => Ok(Self::neighbourhood()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let log = &self.logging;
        if !["trace", "debug", "info", "warn", "error"].contains(&log.level.as_str()) {
            errors.push(ConfigError {
                field: "logging.level".into(),
                message: format!(
                    "must be one of trace, debug, info, warn, error, got \"{}\"",
                    log.level
                ),
            });
        }
        if log.format != "text" && log.format != "json" {
            errors.push(ConfigError {
                field: "logging.format".into(),
                message: format!("must be \"text\" or \"json\", got \"{}\"", log.format),
            });
        }

        let feed = &self.feed;
        if feed.steps == 0 {
            errors.push(ConfigError {
                field: "feed.steps".into(),
                message: "must be > 0".into(),
            });
        }
        if feed.steps_per_day == 0 {
            errors.push(ConfigError {
                field: "feed.steps_per_day".into(),
                message: "must be > 0".into(),
            });
        }

        let mut seen: Vec<&str> = Vec::new();
        for (i, h) in feed.households.iter().enumerate() {
            let field = |name: &str| format!("feed.households[{i}].{name}");

            if let Err(e) = AccountId::new(h.account.as_str()) {
                errors.push(ConfigError {
                    field: field("account"),
                    message: e.to_string(),
                });
            }
            if seen.contains(&h.account.as_str()) {
                errors.push(ConfigError {
                    field: field("account"),
                    message: format!("duplicate account \"{}\"", h.account),
                });
            }
            seen.push(&h.account);

            for (name, value) in [
                ("peak_wh", h.peak_wh),
                ("base_wh", h.base_wh),
                ("swing_wh", h.swing_wh),
                ("noise_std", h.noise_std),
            ] {
                if !value.is_finite() || value < 0.0 {
                    errors.push(ConfigError {
                        field: field(name),
                        message: "must be a finite number >= 0".into(),
                    });
                }
            }
            if h.sunrise_step >= h.sunset_step {
                errors.push(ConfigError {
                    field: field("sunrise_step"),
                    message: "must be < sunset_step".into(),
                });
            }
            if feed.steps_per_day > 0 && h.sunset_step > feed.steps_per_day {
                errors.push(ConfigError {
                    field: field("sunset_step"),
                    message: "must be <= feed.steps_per_day".into(),
                });
            }
        }

        errors
    }
}
