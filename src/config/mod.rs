// Configuration - environment variables overlaid with an optional TOML file

use crate::error::MonitorError;
use crate::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_ALERT_SSL_EXPIRES_IN_DAYS: i64 = 14;
const DEFAULT_MAX_CONCURRENT_CHECKS: usize = 8;

/// Resolved configuration, read-only to the rest of the crate
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub observation_targets: Vec<String>,
    pub pinged_user_ids: Vec<String>,
    pub number_of_attempts: u32,
    /// Seconds slept between retry attempts
    pub attempt_interval: u64,
    pub alert_ssl_expires_in_days: i64,
    pub max_concurrent_checks: usize,
    pub include_system_stats: bool,
}

/// Partial configuration from one source.
///
/// Every overridable field is enumerable and type-checked here; the
/// file overlay replaces only the keys it actually sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigOverlay {
    pub webhook_url: Option<String>,
    pub observation_targets: Option<Vec<String>>,
    pub pinged_user_ids: Option<Vec<String>>,
    pub number_of_attempts: Option<i64>,
    pub attempt_interval: Option<i64>,
    pub alert_ssl_expires_in_days: Option<i64>,
    pub max_concurrent_checks: Option<usize>,
    pub include_system_stats: Option<bool>,
}

impl ConfigOverlay {
    /// Read the overlay from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            webhook_url: env_var("WEBHOOK_URL"),
            observation_targets: env_var("OBSERVATION_TARGETS").map(|v| split_list(&v)),
            pinged_user_ids: env_var("USER_IDS_FOR_PINGING").map(|v| split_list(&v)),
            number_of_attempts: parse_int("NUMBER_OF_ATTEMPTS", env_var("NUMBER_OF_ATTEMPTS"))?,
            attempt_interval: parse_int("ATTEMPT_INTERVAL", env_var("ATTEMPT_INTERVAL"))?,
            alert_ssl_expires_in_days: parse_int(
                "ALERT_SSL_EXPIRES_IN_DAYS",
                env_var("ALERT_SSL_EXPIRES_IN_DAYS"),
            )?,
            max_concurrent_checks: parse_int(
                "MAX_CONCURRENT_CHECKS",
                env_var("MAX_CONCURRENT_CHECKS"),
            )?
            .map(|n| n.max(1) as usize),
            include_system_stats: parse_bool(
                "INCLUDE_SYSTEM_STATS",
                env_var("INCLUDE_SYSTEM_STATS"),
            )?,
        })
    }

    /// Load the overlay from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {:?}: {}", path, e))?;
        let overlay: ConfigOverlay = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("failed to parse config file {:?}: {}", path, e))?;
        Ok(overlay)
    }

    /// Apply `over` on top of `self`, field by field
    pub fn merged_with(self, over: ConfigOverlay) -> Self {
        Self {
            webhook_url: over.webhook_url.or(self.webhook_url),
            observation_targets: over.observation_targets.or(self.observation_targets),
            pinged_user_ids: over.pinged_user_ids.or(self.pinged_user_ids),
            number_of_attempts: over.number_of_attempts.or(self.number_of_attempts),
            attempt_interval: over.attempt_interval.or(self.attempt_interval),
            alert_ssl_expires_in_days: over
                .alert_ssl_expires_in_days
                .or(self.alert_ssl_expires_in_days),
            max_concurrent_checks: over.max_concurrent_checks.or(self.max_concurrent_checks),
            include_system_stats: over.include_system_stats.or(self.include_system_stats),
        }
    }
}

impl Config {
    /// Resolve configuration: environment first, then the optional
    /// file overriding present keys only.
    pub fn resolve(config_file: Option<&Path>) -> Result<Self> {
        let mut overlay = ConfigOverlay::from_env()?;
        if let Some(path) = config_file {
            overlay = overlay.merged_with(ConfigOverlay::from_file(path)?);
        }
        Self::from_overlay(overlay)
    }

    /// Finalize an overlay into a validated configuration
    pub fn from_overlay(overlay: ConfigOverlay) -> Result<Self> {
        let webhook_url = overlay
            .webhook_url
            .ok_or(MonitorError::MissingConfig { key: "WEBHOOK_URL" })?;

        Ok(Self {
            webhook_url,
            observation_targets: overlay.observation_targets.unwrap_or_default(),
            pinged_user_ids: overlay.pinged_user_ids.unwrap_or_default(),
            number_of_attempts: overlay.number_of_attempts.unwrap_or(1).max(1) as u32,
            attempt_interval: overlay.attempt_interval.unwrap_or(1).max(1) as u64,
            alert_ssl_expires_in_days: overlay
                .alert_ssl_expires_in_days
                .unwrap_or(DEFAULT_ALERT_SSL_EXPIRES_IN_DAYS)
                .max(1),
            max_concurrent_checks: overlay
                .max_concurrent_checks
                .unwrap_or(DEFAULT_MAX_CONCURRENT_CHECKS)
                .max(1),
            include_system_stats: overlay.include_system_stats.unwrap_or(false),
        })
    }
}

/// Read an environment variable, treating empty values as unset
fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Split a comma-separated list, dropping empty entries
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

/// Parse an integral value, naming the offending key on failure
fn parse_int(key: &'static str, raw: Option<String>) -> Result<Option<i64>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let parsed = value
                .parse::<i64>()
                .map_err(|_| MonitorError::InvalidConfig {
                    key,
                    message: format!("'{}' is not an integral value", value),
                })?;
            Ok(Some(parsed))
        }
    }
}

/// Parse a boolean value, naming the offending key on failure
fn parse_bool(key: &'static str, raw: Option<String>) -> Result<Option<bool>> {
    match raw.as_deref() {
        None => Ok(None),
        Some("1") | Some("true") | Some("yes") => Ok(Some(true)),
        Some("0") | Some("false") | Some("no") => Ok(Some(false)),
        Some(value) => Err(MonitorError::InvalidConfig {
            key,
            message: format!("'{}' is not a boolean value", value),
        }
        .into()),
    }
}
