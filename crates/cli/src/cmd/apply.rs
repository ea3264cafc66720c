//! Implementation of the `vmss apply` command.
//!
//! Submits the spec and waits for the scale set to be provisioned. The state
//! file is written whatever the outcome, so an accepted but failed creation
//! can still be destroyed later.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info};

use scaleset_lib::lifecycle::{create_or_update, load_state, save_state};
use scaleset_lib::settings::load_settings;
use scaleset_lib::spec::load::load_spec;

use crate::output::{OutputFormat, format_duration, print_error, print_json, print_stat, print_success, print_warning};

use super::{arm_client, runtime};

pub fn cmd_apply(
  file: &Path,
  state_path: &Path,
  config: Option<&Path>,
  timeout: Option<Duration>,
  output: OutputFormat,
) -> Result<()> {
  let spec = load_spec(file).with_context(|| format!("Failed to load spec: {}", file.display()))?;

  let mut settings = load_settings(config).context("Failed to load settings")?;
  if let Some(timeout) = timeout {
    settings.converge.timeout = timeout;
    settings.validate().context("Invalid --timeout")?;
  }
  let client = arm_client(&settings)?;

  let mut state = load_state(state_path).with_context(|| format!("Failed to load state: {}", state_path.display()))?;
  if let Some(id) = &state.id {
    info!(id = %id, "updating existing scale set");
  }

  let rt = runtime()?;
  let result = rt.block_on(create_or_update(&client, &spec, &mut state, &settings.to_policy()));

  if let Err(e) = save_state(state_path, &state) {
    if let Err(apply_err) = &result {
      error!(error = %apply_err, "apply failed before state was saved");
      print_error(&format!("Apply failed: {}", apply_err));
    }
    return Err(e).with_context(|| format!("Failed to save state: {}", state_path.display()));
  }

  let applied = match result {
    Ok(applied) => applied,
    Err(e) => {
      if let Some(id) = &state.id {
        print_warning(&format!("Scale set was accepted as {}; run 'vmss destroy' to remove it", id));
      }
      return Err(e).context("Apply failed");
    }
  };

  if output.is_json() {
    print_json(&json!({
      "id": applied.id,
      "name": spec.name,
      "provisioning_state": applied.remote.provisioning_state().map(|s| s.to_string()),
      "polls": applied.polls,
      "elapsed_ms": applied.elapsed.as_millis() as u64,
    }))?;
  } else {
    print_success(&format!("Scale set '{}' is available", spec.name));
    print_stat("Id", &applied.id);
    print_stat("Polls", &applied.polls.to_string());
    print_stat("Elapsed", &format_duration(applied.elapsed));
    print_stat("State", &state_path.display().to_string());
  }

  Ok(())
}
