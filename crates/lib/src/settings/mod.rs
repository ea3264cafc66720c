//! User settings.
//!
//! Settings are read from a TOML file:
//!
//! ```toml
//! [converge]
//! timeout = "20m"
//! min_poll_interval = "10s"
//!
//! [arm]
//! endpoint = "https://management.azure.com"
//! subscription_id = "00000000-0000-0000-0000-000000000000"
//! api_version = "2016-03-30"
//! ```
//!
//! The file is located by [`resolve_settings_path`]. Every key is optional.
//! `SCALESET_SUBSCRIPTION_ID` and `SCALESET_ARM_ENDPOINT` override the file;
//! the bearer token only ever comes from `SCALESET_ARM_TOKEN`.

mod paths;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  ARM_ENDPOINT_ENV, ARM_TOKEN_ENV, CONFIG_ENV, DEFAULT_ARM_API_VERSION, DEFAULT_ARM_ENDPOINT, DEFAULT_CONVERGE_TIMEOUT,
  DEFAULT_MIN_POLL_INTERVAL, SUBSCRIPTION_ID_ENV,
};
use crate::converge::ConvergePolicy;

pub use paths::{config_dir, default_settings_path};

#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("failed to read settings {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse settings {}: {source}", .path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },

  #[error("invalid settings: {0}")]
  Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  pub converge: ConvergeSettings,
  pub arm: ArmSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvergeSettings {
  #[serde(with = "humantime_duration")]
  pub timeout: Duration,
  #[serde(with = "humantime_duration")]
  pub min_poll_interval: Duration,
}

impl Default for ConvergeSettings {
  fn default() -> Self {
    Self {
      timeout: DEFAULT_CONVERGE_TIMEOUT,
      min_poll_interval: DEFAULT_MIN_POLL_INTERVAL,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArmSettings {
  pub endpoint: String,
  pub subscription_id: Option<String>,
  pub api_version: String,
  #[serde(skip)]
  pub token: Option<String>,
}

impl Default for ArmSettings {
  fn default() -> Self {
    Self {
      endpoint: DEFAULT_ARM_ENDPOINT.to_string(),
      subscription_id: None,
      api_version: DEFAULT_ARM_API_VERSION.to_string(),
      token: None,
    }
  }
}

mod humantime_duration {
  use std::time::Duration;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
  }
}

impl Settings {
  /// Parse settings from TOML without applying the environment.
  pub fn from_toml(content: &str, path: &Path) -> Result<Self, SettingsError> {
    toml::from_str(content).map_err(|source| SettingsError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Apply environment overrides.
  pub fn apply_env(&mut self) {
    if let Ok(subscription_id) = std::env::var(SUBSCRIPTION_ID_ENV) {
      self.arm.subscription_id = Some(subscription_id);
    }
    if let Ok(endpoint) = std::env::var(ARM_ENDPOINT_ENV) {
      self.arm.endpoint = endpoint;
    }
    self.arm.token = std::env::var(ARM_TOKEN_ENV).ok().filter(|t| !t.is_empty());
  }

  pub fn validate(&self) -> Result<(), SettingsError> {
    let converge = &self.converge;
    if converge.min_poll_interval.is_zero() {
      return Err(SettingsError::Invalid(
        "converge.min_poll_interval must be greater than zero".to_string(),
      ));
    }
    if converge.timeout < converge.min_poll_interval {
      return Err(SettingsError::Invalid(format!(
        "converge.timeout ({}) is shorter than converge.min_poll_interval ({})",
        humantime::format_duration(converge.timeout),
        humantime::format_duration(converge.min_poll_interval)
      )));
    }
    if self.arm.endpoint.trim().is_empty() {
      return Err(SettingsError::Invalid("arm.endpoint must not be empty".to_string()));
    }
    Ok(())
  }

  pub fn to_policy(&self) -> ConvergePolicy {
    ConvergePolicy {
      timeout: self.converge.timeout,
      min_poll_interval: self.converge.min_poll_interval,
    }
  }
}

/// Settings file to use, and whether it must exist.
///
/// An explicit path wins, then `SCALESET_CONFIG`, then the default file in
/// the config directory. Only the default file may be missing.
pub fn resolve_settings_path(explicit: Option<&Path>) -> Option<(PathBuf, bool)> {
  if let Some(path) = explicit {
    return Some((path.to_path_buf(), true));
  }
  if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
    return Some((PathBuf::from(path), true));
  }
  default_settings_path().map(|path| (path, false))
}

/// Load, override from the environment, and validate settings.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
  let mut settings = match resolve_settings_path(explicit) {
    Some((path, required)) => match std::fs::read_to_string(&path) {
      Ok(content) => {
        debug!(path = %path.display(), "loading settings");
        Settings::from_toml(&content, &path)?
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
        debug!(path = %path.display(), "settings file not found, using defaults");
        Settings::default()
      }
      Err(source) => return Err(SettingsError::Read { path, source }),
    },
    None => Settings::default(),
  };

  settings.apply_env();
  settings.validate()?;
  Ok(settings)
}
