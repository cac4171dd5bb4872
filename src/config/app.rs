//! Application configuration loading from config.toml
//!
//! Every section carries defaults, so an empty file yields a working (if
//! unseeded) configuration. The file location defaults to `./config.toml` and
//! can be overridden with the `SAMARIDE_CONFIG` environment variable.

use super::seed::SeedConfig;
use crate::{
    core::{PricingPolicy, conversation::CANNED_REPLY, wallet},
    entities::VerificationOutcome,
    errors::{Error, Result},
    services::RetryPolicy,
};
use serde::Deserialize;
use std::{
    env::VarError,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "SAMARIDE_CONFIG";
/// Config file used when `SAMARIDE_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Currency shown next to amounts
    pub currency: String,
    /// Quick top-up buttons on the wallet screen
    pub quick_top_up_amounts: Vec<f64>,
    /// Fare model used for price suggestions
    pub pricing: PricingPolicy,
    /// Retry policy for every service call
    pub retry: RetryPolicy,
    /// Timing and outcomes of the simulated services
    pub simulation: SimulationConfig,
    /// Initial data
    pub seed: SeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: wallet::DEFAULT_CURRENCY.to_string(),
            quick_top_up_amounts: wallet::DEFAULT_QUICK_AMOUNTS.to_vec(),
            pricing: PricingPolicy::default(),
            retry: RetryPolicy::default(),
            simulation: SimulationConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Checks values serde cannot check on its own.
    ///
    /// # Errors
    /// `Config` naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        if self.currency.trim().is_empty() {
            return Err(config_error("currency must not be blank"));
        }
        if let Some(amount) = self
            .quick_top_up_amounts
            .iter()
            .find(|amount| !amount.is_finite() || **amount <= 0.0)
        {
            return Err(config_error(format!(
                "quick top-up amount {amount} must be positive"
            )));
        }
        let confidence = self.simulation.verification_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(config_error(format!(
                "verification confidence {confidence} must be between 0 and 1"
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(config_error("retry.max_attempts must be at least 1"));
        }
        Ok(())
    }
}

/// Timing and outcomes of the in-process service stand-ins.
///
/// # Defaults
/// * `chat_reply_delay_ms`: 1000
/// * `chat_reply`: "Got it! See you soon."
/// * `verification_delay_ms`: 3000
/// * `verification_verified`: true
/// * `verification_confidence`: 0.98
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay before the canned driver reply
    pub chat_reply_delay_ms: u64,
    /// Canned driver reply
    pub chat_reply: String,
    /// Delay before the verification result
    pub verification_delay_ms: u64,
    /// Whether simulated checks pass
    pub verification_verified: bool,
    /// Confidence reported by simulated checks
    pub verification_confidence: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            chat_reply_delay_ms: 1000,
            chat_reply: CANNED_REPLY.to_string(),
            verification_delay_ms: 3000,
            verification_verified: true,
            verification_confidence: 0.98,
        }
    }
}

impl SimulationConfig {
    /// Delay before the canned reply
    #[must_use]
    pub const fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }

    /// Delay before the verification result
    #[must_use]
    pub const fn verification_delay(&self) -> Duration {
        Duration::from_millis(self.verification_delay_ms)
    }

    /// Result every simulated check returns
    #[must_use]
    pub const fn verification_outcome(&self) -> VerificationOutcome {
        VerificationOutcome {
            verified: self.verification_verified,
            confidence: self.verification_confidence,
        }
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
    }
}

/// Parses and validates configuration from TOML text.
///
/// # Errors
/// `Config` if the TOML is malformed or a value is out of range.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig =
        toml::from_str(contents).map_err(|e| config_error(format!("Failed to parse config.toml: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read (`Io`)
/// - The TOML syntax is invalid
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!(?path, "Loading configuration");
    let contents = std::fs::read_to_string(path)
        .inspect_err(|e| warn!(?path, error = %e, "Could not read config file"))?;
    parse_config(&contents)
}

/// Config file location: `$SAMARIDE_CONFIG`, or `./config.toml`.
///
/// # Errors
/// `EnvVar` if `SAMARIDE_CONFIG` is set but is not valid Unicode.
pub fn config_path() -> Result<PathBuf> {
    resolve_config_path(std::env::var(CONFIG_PATH_VAR))
}

/// Picks the config file location from a lookup of `SAMARIDE_CONFIG`.
///
/// An unset or blank variable selects [`DEFAULT_CONFIG_PATH`].
///
/// # Errors
/// `EnvVar` if the variable is set but is not valid Unicode.
pub fn resolve_config_path(lookup: std::result::Result<String, VarError>) -> Result<PathBuf> {
    match lookup {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        Ok(_) | Err(VarError::NotPresent) => Ok(PathBuf::from(DEFAULT_CONFIG_PATH)),
        Err(e) => Err(e.into()),
    }
}

/// Loads configuration from [`config_path`].
///
/// # Errors
/// `EnvVar` for an unreadable `SAMARIDE_CONFIG`, otherwise as [`load_config`].
pub fn load_default_config() -> Result<AppConfig> {
    let path = config_path()?;
    let config = load_config(&path)?;
    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
