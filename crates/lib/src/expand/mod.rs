//! Mapping between the declarative spec and the provider wire model.
//!
//! - [`expand`]: [`ScaleSetSpec`] -> [`RemoteScaleSet`] request body
//! - [`flatten`]: [`RemoteScaleSet`] response -> [`ScaleSetSpec`]
//!
//! Both directions are pure; neither performs I/O.
//!
//! # Field mapping
//!
//! | Spec | Wire |
//! |---|---|
//! | `sku.{name,tier,capacity}` | `sku.{name,tier,capacity}` (empty tier omitted) |
//! | `upgrade_policy_mode` | `properties.upgradePolicy.mode` |
//! | `network_profile[*].{name,primary}` | `...networkProfile.networkInterfaceConfigurations[*].{name,properties.primary}` |
//! | `...ip_configuration[*].{name,subnet_id}` | `...ipConfigurations[*].{name,properties.subnet.id}` |
//! | `...load_balancer_backend_address_pool_ids` | `...ipConfigurations[*].properties.loadBalancerBackendAddressPools[*].id` |
//! | `os_disk` | `...storageProfile.osDisk` |

use tracing::debug;

use crate::remote::model::{
  ApiEntityReference, IpConfiguration as WireIpConfiguration, IpConfigurationProperties, NetworkInterfaceConfiguration,
  NetworkInterfaceProperties, NetworkProfile, OsDisk, ScaleSetProperties, Sku, StorageProfile, SubResource,
  UpgradePolicy, VirtualHardDisk, VmProfile,
};
use crate::remote::RemoteScaleSet;
use crate::spec::{
  IpConfiguration, NetworkProfileElement, OsDiskProfileElement, ScaleSetSpec, SkuElement, SpecError, UpgradeMode,
  normalize_location,
};
use crate::util::set::ElementSet;

/// Build the create-or-update request body for `spec`.
///
/// Fails with [`SpecError::InvalidSpec`] when the spec does not satisfy
/// [`ScaleSetSpec::validate`]; a returned request is always complete.
pub fn expand(spec: &ScaleSetSpec) -> Result<RemoteScaleSet, SpecError> {
  spec.validate()?;

  let sku = expand_sku(spec.single_sku()?);
  let os_disk = spec
    .os_disk
    .iter()
    .next()
    .map(expand_os_disk)
    .ok_or_else(|| SpecError::InvalidSpec("exactly one os disk profile required".to_string()))?;

  let network_interface_configurations: Vec<NetworkInterfaceConfiguration> =
    spec.network_profile.iter().map(expand_network_profile).collect();

  debug!(
    name = %spec.name,
    nics = network_interface_configurations.len(),
    "expanded scale set request"
  );

  Ok(RemoteScaleSet {
    id: None,
    name: Some(spec.name.clone()),
    location: Some(spec.location.clone()),
    tags: spec.tags.clone(),
    sku: Some(sku),
    properties: Some(ScaleSetProperties {
      upgrade_policy: Some(UpgradePolicy {
        mode: Some(spec.upgrade_policy_mode.as_str().to_string()),
      }),
      virtual_machine_profile: Some(VmProfile {
        storage_profile: Some(StorageProfile { os_disk: Some(os_disk) }),
        network_profile: Some(NetworkProfile {
          network_interface_configurations,
        }),
      }),
      provisioning_state: None,
    }),
  })
}

fn expand_sku(sku: &SkuElement) -> Sku {
  Sku {
    name: Some(sku.name.clone()),
    tier: sku.tier.clone().filter(|t| !t.is_empty()),
    capacity: Some(sku.capacity),
  }
}

fn expand_network_profile(profile: &NetworkProfileElement) -> NetworkInterfaceConfiguration {
  NetworkInterfaceConfiguration {
    name: Some(profile.name.clone()),
    properties: Some(NetworkInterfaceProperties {
      primary: Some(profile.primary),
      ip_configurations: profile.ip_configuration.iter().map(expand_ip_configuration).collect(),
    }),
  }
}

fn expand_ip_configuration(ip: &IpConfiguration) -> WireIpConfiguration {
  WireIpConfiguration {
    name: Some(ip.name.clone()),
    properties: Some(IpConfigurationProperties {
      subnet: Some(ApiEntityReference {
        id: Some(ip.subnet_id.clone()),
      }),
      load_balancer_backend_address_pools: ip
        .load_balancer_backend_address_pool_ids
        .iter()
        .map(|id| SubResource { id: Some(id.clone()) })
        .collect(),
    }),
  }
}

fn expand_os_disk(disk: &OsDiskProfileElement) -> OsDisk {
  OsDisk {
    name: Some(disk.name.clone()),
    caching: Some(disk.caching.as_str().to_string()),
    create_option: Some(disk.create_option.as_str().to_string()),
    os_type: Some(disk.os_type.as_str().to_string()),
    image: disk.image.as_ref().map(|uri| VirtualHardDisk { uri: Some(uri.clone()) }),
    vhd_containers: disk.vhd_containers.iter().cloned().collect(),
  }
}

/// Reconstruct a spec from the provider's view of a scale set.
///
/// The resource group is not part of the response body, so it comes from the
/// caller (usually the parsed identity). The location is normalized.
pub fn flatten(remote: &RemoteScaleSet, resource_group: &str) -> Result<ScaleSetSpec, SpecError> {
  let name = remote.name.clone().ok_or(SpecError::IncompleteRemote("name"))?;
  let location = remote
    .location
    .as_deref()
    .map(normalize_location)
    .ok_or(SpecError::IncompleteRemote("location"))?;

  let sku = flatten_sku(remote.sku.as_ref().ok_or(SpecError::IncompleteRemote("sku"))?)?;

  let properties = remote
    .properties
    .as_ref()
    .ok_or(SpecError::IncompleteRemote("properties"))?;

  let upgrade_policy_mode: UpgradeMode = properties
    .upgrade_policy
    .as_ref()
    .and_then(|p| p.mode.as_deref())
    .ok_or(SpecError::IncompleteRemote("upgradePolicy.mode"))?
    .parse()?;

  let vm_profile = properties
    .virtual_machine_profile
    .as_ref()
    .ok_or(SpecError::IncompleteRemote("virtualMachineProfile"))?;

  let network_profile: ElementSet<NetworkProfileElement> = vm_profile
    .network_profile
    .as_ref()
    .map(|np| np.network_interface_configurations.as_slice())
    .unwrap_or_default()
    .iter()
    .map(flatten_network_profile)
    .collect::<Result<_, _>>()?;

  let os_disk: ElementSet<OsDiskProfileElement> = vm_profile
    .storage_profile
    .as_ref()
    .and_then(|sp| sp.os_disk.as_ref())
    .map(flatten_os_disk)
    .transpose()?
    .into_iter()
    .collect();

  Ok(ScaleSetSpec {
    name,
    location,
    resource_group: resource_group.to_string(),
    sku: std::iter::once(sku).collect(),
    upgrade_policy_mode,
    network_profile,
    os_disk,
    tags: remote.tags.clone(),
  })
}

fn flatten_sku(sku: &Sku) -> Result<SkuElement, SpecError> {
  Ok(SkuElement {
    name: sku.name.clone().ok_or(SpecError::IncompleteRemote("sku.name"))?,
    tier: sku.tier.clone(),
    capacity: sku.capacity.ok_or(SpecError::IncompleteRemote("sku.capacity"))?,
  })
}

fn flatten_network_profile(nic: &NetworkInterfaceConfiguration) -> Result<NetworkProfileElement, SpecError> {
  let name = nic
    .name
    .clone()
    .ok_or(SpecError::IncompleteRemote("networkInterfaceConfigurations.name"))?;
  let properties = nic
    .properties
    .as_ref()
    .ok_or(SpecError::IncompleteRemote("networkInterfaceConfigurations.properties"))?;

  let ip_configuration: Vec<IpConfiguration> = properties
    .ip_configurations
    .iter()
    .map(flatten_ip_configuration)
    .collect::<Result<_, _>>()?;

  Ok(NetworkProfileElement {
    name,
    primary: properties.primary.unwrap_or(false),
    ip_configuration,
  })
}

fn flatten_ip_configuration(ip: &WireIpConfiguration) -> Result<IpConfiguration, SpecError> {
  let name = ip.name.clone().ok_or(SpecError::IncompleteRemote("ipConfigurations.name"))?;
  let properties = ip
    .properties
    .as_ref()
    .ok_or(SpecError::IncompleteRemote("ipConfigurations.properties"))?;
  let subnet_id = properties
    .subnet
    .as_ref()
    .and_then(|s| s.id.clone())
    .ok_or(SpecError::IncompleteRemote("ipConfigurations.subnet.id"))?;

  Ok(IpConfiguration {
    name,
    subnet_id,
    load_balancer_backend_address_pool_ids: properties
      .load_balancer_backend_address_pools
      .iter()
      .filter_map(|pool| pool.id.clone())
      .collect(),
  })
}

fn flatten_os_disk(disk: &OsDisk) -> Result<OsDiskProfileElement, SpecError> {
  Ok(OsDiskProfileElement {
    name: disk.name.clone().ok_or(SpecError::IncompleteRemote("osDisk.name"))?,
    image: disk.image.as_ref().and_then(|i| i.uri.clone()),
    vhd_containers: disk.vhd_containers.iter().cloned().collect(),
    caching: disk
      .caching
      .as_deref()
      .ok_or(SpecError::IncompleteRemote("osDisk.caching"))?
      .parse()?,
    os_type: disk
      .os_type
      .as_deref()
      .ok_or(SpecError::IncompleteRemote("osDisk.osType"))?
      .parse()?,
    create_option: disk
      .create_option
      .as_deref()
      .ok_or(SpecError::IncompleteRemote("osDisk.createOption"))?
      .parse()?,
  })
}
