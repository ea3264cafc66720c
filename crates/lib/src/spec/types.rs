//! Desired-state types for a scale set.
//!
//! These are the typed, already-validated form of the declarative
//! configuration. Every unordered collection is an [`ElementSet`], so its
//! members are identified by fingerprint rather than by position.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::hash::{Fingerprint, FingerprintBuilder, SetElement};
use crate::util::set::ElementSet;

use super::SpecError;

/// Declares a closed string enum whose serialized form is the provider value.
macro_rules! provider_enum {
  ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum $name {
      $(#[serde(rename = $value)] $variant),+
    }

    impl $name {
      pub const ALL: &'static [$name] = &[$($name::$variant),+];

      pub fn as_str(self) -> &'static str {
        match self {
          $($name::$variant => $value),+
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    /// Provider values are matched case-insensitively.
    impl FromStr for $name {
      type Err = SpecError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        $name::ALL
          .iter()
          .copied()
          .find(|v| v.as_str().eq_ignore_ascii_case(s))
          .ok_or_else(|| SpecError::UnknownValue {
            field: stringify!($name),
            value: s.to_string(),
          })
      }
    }
  };
}

provider_enum!(
  /// How instances pick up a changed model.
  UpgradeMode {
    Manual => "Manual",
    Automatic => "Automatic",
    Rolling => "Rolling",
  }
);

provider_enum!(
  CachingMode {
    None => "None",
    ReadOnly => "ReadOnly",
    ReadWrite => "ReadWrite",
  }
);

provider_enum!(
  OsType {
    Linux => "Linux",
    Windows => "Windows",
  }
);

provider_enum!(
  /// How the OS disk is sourced.
  CreateOption {
    FromImage => "FromImage",
    Attach => "Attach",
    Empty => "Empty",
  }
);

/// Size, tier, and instance count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuElement {
  pub name: String,
  /// `None` and `Some("")` are distinct identities.
  #[serde(default)]
  pub tier: Option<String>,
  pub capacity: u32,
}

impl SetElement for SkuElement {
  fn fingerprint(&self) -> Fingerprint {
    FingerprintBuilder::new()
      .field(&self.name)
      .optional_field(self.tier.as_deref())
      .field(self.capacity)
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpConfiguration {
  pub name: String,
  pub subnet_id: String,
  #[serde(default)]
  pub load_balancer_backend_address_pool_ids: ElementSet<String>,
}

/// One network interface configuration of the instance model.
///
/// Exactly one profile should be primary; that is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkProfileElement {
  pub name: String,
  pub primary: bool,
  /// Ordered; not part of the element's identity.
  pub ip_configuration: Vec<IpConfiguration>,
}

impl SetElement for NetworkProfileElement {
  fn fingerprint(&self) -> Fingerprint {
    FingerprintBuilder::new().field(&self.name).field(self.primary).finish()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsDiskProfileElement {
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
  pub vhd_containers: ElementSet<String>,
  pub caching: CachingMode,
  pub os_type: OsType,
  pub create_option: CreateOption,
}

impl SetElement for OsDiskProfileElement {
  fn fingerprint(&self) -> Fingerprint {
    FingerprintBuilder::new()
      .field(&self.name)
      .field(self.caching)
      .field(self.os_type)
      .field(self.create_option)
      .optional_field(self.image.as_deref())
      .finish()
  }
}

/// The desired state of one scale set.
///
/// `name`, `location` and `resource_group` identify the remote resource and
/// cannot change in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSetSpec {
  pub name: String,
  pub location: String,
  #[serde(rename = "resource_group_name")]
  pub resource_group: String,
  pub sku: ElementSet<SkuElement>,
  pub upgrade_policy_mode: UpgradeMode,
  #[serde(rename = "virtual_machine_network_profile")]
  pub network_profile: ElementSet<NetworkProfileElement>,
  #[serde(rename = "virtual_machine_storage_profile_os_disk")]
  pub os_disk: ElementSet<OsDiskProfileElement>,
  #[serde(default)]
  pub tags: BTreeMap<String, String>,
}

impl ScaleSetSpec {
  /// Check the invariants the remote request depends on.
  ///
  /// The SKU cardinality is checked first so that a multi-SKU spec always
  /// reports the same error.
  pub fn validate(&self) -> Result<(), SpecError> {
    if self.sku.len() != 1 {
      return Err(SpecError::InvalidSpec("exactly one sku required".to_string()));
    }

    for (field, value) in [
      ("name", &self.name),
      ("location", &self.location),
      ("resource_group_name", &self.resource_group),
    ] {
      if value.trim().is_empty() {
        return Err(SpecError::InvalidSpec(format!("{} must not be empty", field)));
      }
    }

    if self.network_profile.is_empty() {
      return Err(SpecError::InvalidSpec(
        "at least one network profile required".to_string(),
      ));
    }

    for profile in &self.network_profile {
      if profile.ip_configuration.is_empty() {
        return Err(SpecError::InvalidSpec(format!(
          "network profile '{}' requires at least one ip configuration",
          profile.name
        )));
      }
      for ip in &profile.ip_configuration {
        if ip.subnet_id.trim().is_empty() {
          return Err(SpecError::InvalidSpec(format!(
            "ip configuration '{}' requires a subnet_id",
            ip.name
          )));
        }
      }
    }

    if self.os_disk.len() != 1 {
      return Err(SpecError::InvalidSpec("exactly one os disk profile required".to_string()));
    }

    Ok(())
  }

  /// The single SKU element, if the spec is valid.
  pub fn single_sku(&self) -> Result<&SkuElement, SpecError> {
    let mut skus = self.sku.iter();
    match (skus.next(), skus.next()) {
      (Some(sku), None) => Ok(sku),
      _ => Err(SpecError::InvalidSpec("exactly one sku required".to_string())),
    }
  }
}

/// Canonical form of a location: lowercase with spaces removed (`"West US"` -> `"westus"`).
pub fn normalize_location(location: &str) -> String {
  location.to_lowercase().replace(' ', "")
}
