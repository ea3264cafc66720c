//! Implementation of the `vmss read` command.
//!
//! Reads the recorded scale set back from the provider. With `--spec`, the
//! remote scale set is compared against the spec and any drift is listed.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use scaleset_lib::lifecycle::{ResourceState, drift, load_state, read, save_state};
use scaleset_lib::settings::load_settings;
use scaleset_lib::spec::diff::SpecDiff;
use scaleset_lib::spec::load::load_spec;
use scaleset_lib::spec::{ScaleSetSpec, UpgradeMode};
use scaleset_lib::util::set::SetDiff;

use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, print_warning, symbols};

use super::{arm_client, runtime};

pub fn cmd_read(state_path: &Path, spec_file: Option<&Path>, config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let mut state = load_state(state_path).with_context(|| format!("Failed to load state: {}", state_path.display()))?;
  if state.id.is_none() {
    if output.is_json() {
      print_json(&json!({ "exists": false }))?;
    } else {
      print_info("No scale set recorded. Run 'vmss apply' to create one.");
    }
    return Ok(());
  }
  let before = state.clone();

  let desired = spec_file
    .map(|file| load_spec(file).with_context(|| format!("Failed to load spec: {}", file.display())))
    .transpose()?;

  let settings = load_settings(config).context("Failed to load settings")?;
  let client = arm_client(&settings)?;
  let rt = runtime()?;

  let result = match &desired {
    Some(spec) => rt
      .block_on(drift(&client, spec, &mut state))
      .map(|diff| diff.map(Observed::Drift)),
    None => rt.block_on(read(&client, &mut state)).map(|spec| spec.map(Observed::Spec)),
  }
  .context("Read failed")?;

  if state != before {
    save_state(state_path, &state).with_context(|| format!("Failed to save state: {}", state_path.display()))?;
  }

  match result {
    None => report_gone(&before, output),
    Some(Observed::Spec(spec)) => report_spec(&spec, output),
    Some(Observed::Drift(diff)) => report_drift(&diff, output),
  }
}

enum Observed {
  Spec(ScaleSetSpec),
  Drift(SpecDiff),
}

fn report_gone(before: &ResourceState, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(&json!({ "exists": false }));
  }
  print_warning(&format!(
    "Scale set {} no longer exists; identity cleared",
    before.id.as_deref().unwrap_or_default()
  ));
  Ok(())
}

fn report_spec(spec: &ScaleSetSpec, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(&json!({ "exists": true, "spec": spec }));
  }

  print_success(&format!("Scale set '{}'", spec.name));
  print_stat("Resource group", &spec.resource_group);
  print_stat("Location", &spec.location);
  print_stat("Upgrade mode", spec.upgrade_policy_mode.as_str());
  for sku in &spec.sku {
    let tier = sku.tier.as_deref().unwrap_or("-");
    print_stat("Sku", &format!("{} ({}), capacity {}", sku.name, tier, sku.capacity));
  }
  print_stat("Network profiles", &spec.network_profile.len().to_string());
  print_stat("OS disks", &spec.os_disk.len().to_string());
  for (key, value) in &spec.tags {
    print_stat("Tag", &format!("{}={}", key, value));
  }
  Ok(())
}

fn report_drift(diff: &SpecDiff, output: OutputFormat) -> Result<()> {
  if output.is_json() {
    return print_json(&json!({
      "exists": true,
      "drifted": !diff.is_empty(),
      "requires_replacement": diff.requires_replacement(),
      "diff": diff,
    }));
  }

  if diff.is_empty() {
    print_success("No drift detected.");
    return Ok(());
  }

  println!("Drift detected:");
  for field in &diff.replace {
    println!("  {} {} (forces replacement)", symbols::MODIFY, field);
  }
  print_set_diff("sku", &diff.sku);
  print_set_diff("network profile", &diff.network_profile);
  print_set_diff("os disk", &diff.os_disk);
  if let Some((observed, desired)) = diff.upgrade_policy_mode {
    print_mode_change(observed, desired);
  }
  if diff.tags_changed {
    println!("  {} tags", symbols::MODIFY);
  }
  Ok(())
}

fn print_set_diff(label: &str, diff: &SetDiff) {
  for fp in &diff.added {
    println!("  {} {} [{}]", symbols::ADD, label, fp);
  }
  for fp in &diff.modified {
    println!("  {} {} [{}]", symbols::MODIFY, label, fp);
  }
  for fp in &diff.removed {
    println!("  {} {} [{}]", symbols::REMOVE, label, fp);
  }
}

fn print_mode_change(observed: UpgradeMode, desired: UpgradeMode) {
  println!(
    "  {} upgrade mode {} {} {}",
    symbols::MODIFY,
    observed,
    symbols::ARROW,
    desired
  );
}
