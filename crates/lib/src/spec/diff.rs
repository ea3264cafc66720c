//! Drift between a desired spec and the spec flattened from remote state.
//!
//! Unordered collections are compared by fingerprint through
//! [`ElementSet::diff`](crate::util::set::ElementSet::diff), so reordering
//! elements in the source configuration never shows up as drift.
//!
//! # Computed fields
//!
//! The provider fills in some optional fields on its own (the SKU tier, the OS
//! disk image). When the desired spec leaves such a field unset, the observed
//! value is ignored for the comparison. An empty tier is never sent, so it
//! counts as unset.

use serde::Serialize;

use super::{ScaleSetSpec, UpgradeMode, normalize_location};
use crate::util::set::{ElementSet, SetDiff};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SpecDiff {
  /// Identity fields that differ. Any entry means the scale set must be replaced.
  pub replace: Vec<&'static str>,

  pub sku: SetDiff,
  pub network_profile: SetDiff,
  pub os_disk: SetDiff,

  /// `(observed, desired)` when the upgrade mode differs.
  pub upgrade_policy_mode: Option<(UpgradeMode, UpgradeMode)>,

  pub tags_changed: bool,
}

impl SpecDiff {
  /// Returns true if remote state already matches the desired spec.
  pub fn is_empty(&self) -> bool {
    self.replace.is_empty()
      && self.sku.is_empty()
      && self.network_profile.is_empty()
      && self.os_disk.is_empty()
      && self.upgrade_policy_mode.is_none()
      && !self.tags_changed
  }

  pub fn requires_replacement(&self) -> bool {
    !self.replace.is_empty()
  }
}

/// Compute the changes needed to turn `observed` into `desired`.
pub fn compute_diff(desired: &ScaleSetSpec, observed: &ScaleSetSpec) -> SpecDiff {
  let desired = &drop_empty_tier(desired);
  let observed = adopt_computed(desired, observed);
  let mut diff = SpecDiff::default();

  if desired.name != observed.name {
    diff.replace.push("name");
  }
  if normalize_location(&desired.location) != normalize_location(&observed.location) {
    diff.replace.push("location");
  }
  if !desired.resource_group.eq_ignore_ascii_case(&observed.resource_group) {
    diff.replace.push("resource_group_name");
  }

  diff.sku = desired.sku.diff(&observed.sku);
  diff.network_profile = desired.network_profile.diff(&observed.network_profile);
  diff.os_disk = desired.os_disk.diff(&observed.os_disk);

  if desired.upgrade_policy_mode != observed.upgrade_policy_mode {
    diff.upgrade_policy_mode = Some((observed.upgrade_policy_mode, desired.upgrade_policy_mode));
  }

  diff.tags_changed = desired.tags != observed.tags;

  diff
}

fn drop_empty_tier(spec: &ScaleSetSpec) -> ScaleSetSpec {
  let mut spec = spec.clone();
  spec.sku = spec
    .sku
    .into_iter()
    .map(|mut s| {
      s.tier = s.tier.filter(|t| !t.is_empty());
      s
    })
    .collect::<ElementSet<_>>();
  spec
}

/// Clear provider-computed fields in `observed` that `desired` leaves unset.
fn adopt_computed(desired: &ScaleSetSpec, observed: &ScaleSetSpec) -> ScaleSetSpec {
  let mut observed = observed.clone();

  if desired.sku.iter().all(|s| s.tier.is_none()) {
    observed.sku = observed
      .sku
      .into_iter()
      .map(|mut s| {
        s.tier = None;
        s
      })
      .collect::<ElementSet<_>>();
  }

  if desired.os_disk.iter().all(|d| d.image.is_none()) {
    observed.os_disk = observed
      .os_disk
      .into_iter()
      .map(|mut d| {
        d.image = None;
        d
      })
      .collect::<ElementSet<_>>();
  }

  observed
}
