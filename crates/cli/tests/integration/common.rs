//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const SCALE_SET_PATH: &str =
  "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachineScaleSets/vmss1";

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Provider response with the given provisioning state.
pub fn remote_body(state: &str) -> String {
  fixture_content("remote_succeeded.json").replace("\"Succeeded\"", &format!("\"{}\"", state))
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a settings file that
/// points at the mock server, and the state file.
pub struct TestEnv {
  pub temp: TempDir,
  pub settings_path: PathBuf,
  pub state_path: PathBuf,
}

impl TestEnv {
  /// Settings pointing at `endpoint` with fast polling.
  pub fn new(endpoint: &str) -> Self {
    Self::with_timeout(endpoint, "5s")
  }

  pub fn with_timeout(endpoint: &str, timeout: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let settings_path = temp.path().join("config.toml");
    let settings = format!(
      "[converge]\ntimeout = \"{}\"\nmin_poll_interval = \"10ms\"\n\n[arm]\nendpoint = \"{}\"\nsubscription_id = \"sub\"\n",
      timeout, endpoint
    );
    std::fs::write(&settings_path, settings).unwrap();
    let state_path = temp.path().join("vmss.state.json");
    Self {
      temp,
      settings_path,
      state_path,
    }
  }

  /// Record `id` as the current identity.
  pub fn write_state(&self, id: &str) {
    std::fs::write(&self.state_path, format!("{{\"id\":\"{}\"}}", id)).unwrap();
  }

  /// Identity currently in the state file.
  pub fn state_id(&self) -> Option<String> {
    let content = std::fs::read_to_string(&self.state_path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    value.get("id").and_then(|id| id.as_str()).map(str::to_string)
  }

  pub fn state_path(&self) -> &Path {
    &self.state_path
  }

  /// A `vmss` command using this environment's settings and state.
  ///
  /// The subcommand goes first so `--state` lands on it.
  pub fn vmss_cmd(&self, subcommand: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("vmss");
    cmd
      .arg(subcommand)
      .arg("--config")
      .arg(&self.settings_path)
      .arg("--state")
      .arg(&self.state_path)
      .env_remove("SCALESET_CONFIG")
      .env_remove("SCALESET_SUBSCRIPTION_ID")
      .env_remove("SCALESET_ARM_ENDPOINT")
      .env("SCALESET_ARM_TOKEN", "test-token")
      .env_remove("RUST_LOG");
    cmd
  }
}
