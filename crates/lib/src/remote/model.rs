//! Wire model of a scale set as the provider accepts and returns it.
//!
//! The same shape is used for the create-or-update request body and for GET
//! responses; provider-computed fields (`id`, `provisioningState`) are simply
//! absent from requests. Every field is optional on the wire, and empty
//! optionals are never serialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteScaleSet {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub tags: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sku: Option<Sku>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub properties: Option<ScaleSetProperties>,
}

impl RemoteScaleSet {
  pub fn provisioning_state(&self) -> Option<&ProvisioningState> {
    self.properties.as_ref().and_then(|p| p.provisioning_state.as_ref())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tier: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSetProperties {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub upgrade_policy: Option<UpgradePolicy>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub virtual_machine_profile: Option<VmProfile>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub provisioning_state: Option<ProvisioningState>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradePolicy {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmProfile {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub storage_profile: Option<StorageProfile>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub network_profile: Option<NetworkProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageProfile {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub os_disk: Option<OsDisk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsDisk {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub caching: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub create_option: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub os_type: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<VirtualHardDisk>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub vhd_containers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualHardDisk {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
  #[serde(default)]
  pub network_interface_configurations: Vec<NetworkInterfaceConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceConfiguration {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub properties: Option<NetworkInterfaceProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceProperties {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub primary: Option<bool>,
  #[serde(default)]
  pub ip_configurations: Vec<IpConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub properties: Option<IpConfigurationProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpConfigurationProperties {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subnet: Option<ApiEntityReference>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub load_balancer_backend_address_pools: Vec<SubResource>,
}

/// Reference to another provider resource by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEntityReference {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubResource {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
}

/// Provisioning state reported by the provider.
///
/// The vocabulary is open: states this crate does not know are kept verbatim
/// in [`ProvisioningState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProvisioningState {
  Creating,
  Updating,
  Succeeded,
  Failed,
  Canceled,
  Deleting,
  Other(String),
}

impl ProvisioningState {
  pub fn as_str(&self) -> &str {
    match self {
      ProvisioningState::Creating => "Creating",
      ProvisioningState::Updating => "Updating",
      ProvisioningState::Succeeded => "Succeeded",
      ProvisioningState::Failed => "Failed",
      ProvisioningState::Canceled => "Canceled",
      ProvisioningState::Deleting => "Deleting",
      ProvisioningState::Other(s) => s,
    }
  }
}

impl From<String> for ProvisioningState {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Creating" => ProvisioningState::Creating,
      "Updating" => ProvisioningState::Updating,
      "Succeeded" => ProvisioningState::Succeeded,
      "Failed" => ProvisioningState::Failed,
      "Canceled" => ProvisioningState::Canceled,
      "Deleting" => ProvisioningState::Deleting,
      _ => ProvisioningState::Other(s),
    }
  }
}

impl From<ProvisioningState> for String {
  fn from(state: ProvisioningState) -> Self {
    match state {
      ProvisioningState::Other(s) => s,
      known => known.as_str().to_string(),
    }
  }
}

impl std::fmt::Display for ProvisioningState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
