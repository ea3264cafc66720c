//! Implementation of the `vmss destroy` command.
//!
//! Requests deletion of the scale set recorded in the state file. Deletion
//! is not awaited; the identity is cleared once the provider accepts it.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use scaleset_lib::lifecycle::{delete, load_state, save_state};
use scaleset_lib::settings::load_settings;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success};

use super::{arm_client, runtime};

pub fn cmd_destroy(state_path: &Path, config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let mut state = load_state(state_path).with_context(|| format!("Failed to load state: {}", state_path.display()))?;

  let Some(id) = state.id.clone() else {
    if output.is_json() {
      print_json(&json!({ "deleted": null }))?;
    } else {
      print_info("Nothing to destroy.");
    }
    return Ok(());
  };

  let settings = load_settings(config).context("Failed to load settings")?;
  let client = arm_client(&settings)?;

  let rt = runtime()?;
  rt.block_on(delete(&client, &mut state)).context("Destroy failed")?;

  save_state(state_path, &state).with_context(|| format!("Failed to save state: {}", state_path.display()))?;

  if output.is_json() {
    print_json(&json!({ "deleted": id }))?;
  } else {
    print_success("Deletion requested");
    print_stat("Id", &id);
  }

  Ok(())
}
