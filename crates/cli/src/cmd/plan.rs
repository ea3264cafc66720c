//! Implementation of the `vmss plan` command.
//!
//! Loads and validates a spec, expands it into the provider request, and
//! prints the request together with the fingerprint of every set element.
//! Nothing is sent to the provider.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use scaleset_lib::expand::expand;
use scaleset_lib::spec::load::load_spec;
use scaleset_lib::spec::normalize_location;
use scaleset_lib::util::hash::SetElement;

use crate::output::{OutputFormat, print_json, print_stat, print_success, symbols};

pub fn cmd_plan(file: &Path, output: OutputFormat) -> Result<()> {
  let spec = load_spec(file).with_context(|| format!("Failed to load spec: {}", file.display()))?;
  let request = expand(&spec).context("Failed to expand spec")?;

  if output.is_json() {
    let fingerprints = json!({
      "sku": spec.sku.fingerprints().collect::<Vec<_>>(),
      "network_profile": spec.network_profile.fingerprints().collect::<Vec<_>>(),
      "os_disk": spec.os_disk.fingerprints().collect::<Vec<_>>(),
    });
    return print_json(&json!({ "request": request, "fingerprints": fingerprints }));
  }

  print_success(&format!("Spec for scale set '{}' is valid", spec.name));
  print_stat("Resource group", &spec.resource_group);
  print_stat("Location", &normalize_location(&spec.location));
  print_stat("Upgrade mode", spec.upgrade_policy_mode.as_str());
  if !spec.tags.is_empty() {
    print_stat("Tags", &spec.tags.len().to_string());
  }

  println!();
  println!("Elements:");
  for sku in &spec.sku {
    let tier = sku.tier.as_deref().filter(|t| !t.is_empty()).unwrap_or("-");
    println!(
      "  {} sku {} ({}, capacity {}) [{}]",
      symbols::ADD,
      sku.name,
      tier,
      sku.capacity,
      sku.fingerprint()
    );
  }
  for nic in &spec.network_profile {
    let primary = if nic.primary { ", primary" } else { "" };
    println!(
      "  {} network profile {} ({} ip configuration(s){}) [{}]",
      symbols::ADD,
      nic.name,
      nic.ip_configuration.len(),
      primary,
      nic.fingerprint()
    );
  }
  for disk in &spec.os_disk {
    println!(
      "  {} os disk {} ({}, {}, {}) [{}]",
      symbols::ADD,
      disk.name,
      disk.os_type,
      disk.caching,
      disk.create_option,
      disk.fingerprint()
    );
  }

  println!();
  println!("Request:");
  let request_json = serde_json::to_string_pretty(&request).context("Failed to serialize request")?;
  println!("{}", request_json);

  Ok(())
}
