use crate::consts::{APP_NAME, SETTINGS_FILENAME};
use std::path::PathBuf;

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_NAME))
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> Option<PathBuf> {
  let config_home = std::env::var_os("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
  Some(config_home.join(APP_NAME))
}

/// Default settings file, if a config directory can be determined.
pub fn default_settings_path() -> Option<PathBuf> {
  config_dir().map(|dir| dir.join(SETTINGS_FILENAME))
}
