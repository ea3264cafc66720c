//! Test fixtures shared across scaleset-lib unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::spec::{
  CachingMode, CreateOption, IpConfiguration, NetworkProfileElement, OsDiskProfileElement, OsType, ScaleSetSpec,
  SkuElement, UpgradeMode,
};
use crate::remote::{ProvisioningState, RemoteScaleSet, ScaleSetApi, TransportError};
use crate::util::set::ElementSet;

pub const SUBNET_ID: &str =
  "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vn/subnets/default";

pub const SCALE_SET_ID: &str =
  "/subscriptions/sub/resourceGroups/rg1/providers/Microsoft.Compute/virtualMachineScaleSets/vmss1";

/// A valid single-SKU spec named `vmss1` in resource group `rg1`.
pub fn sample_spec() -> ScaleSetSpec {
  let mut tags = BTreeMap::new();
  tags.insert("env".to_string(), "test".to_string());

  ScaleSetSpec {
    name: "vmss1".to_string(),
    location: "West US".to_string(),
    resource_group: "rg1".to_string(),
    sku: vec![SkuElement {
      name: "Standard_A0".to_string(),
      tier: Some("Standard".to_string()),
      capacity: 2,
    }]
    .into_iter()
    .collect(),
    upgrade_policy_mode: UpgradeMode::Manual,
    network_profile: vec![NetworkProfileElement {
      name: "nic".to_string(),
      primary: true,
      ip_configuration: vec![IpConfiguration {
        name: "ipconfig".to_string(),
        subnet_id: SUBNET_ID.to_string(),
        load_balancer_backend_address_pool_ids: ElementSet::new(),
      }],
    }]
    .into_iter()
    .collect(),
    os_disk: vec![OsDiskProfileElement {
      name: "osdisk".to_string(),
      image: None,
      vhd_containers: vec![
        "https://acct.blob.core.windows.net/vhds-a".to_string(),
        "https://acct.blob.core.windows.net/vhds-b".to_string(),
      ]
      .into_iter()
      .collect(),
      caching: CachingMode::ReadWrite,
      os_type: OsType::Linux,
      create_option: CreateOption::FromImage,
    }]
    .into_iter()
    .collect(),
    tags,
  }
}

/// A call recorded by [`FakeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  Submit { resource_group: String, name: String },
  Get { resource_group: String, name: String },
  Delete { resource_group: String, name: String },
}

/// Scripted in-memory [`ScaleSetApi`]. `get` pops scripted responses; the
/// last one repeats.
#[derive(Debug, Default)]
pub struct FakeApi {
  pub submit_response: Mutex<Option<Result<RemoteScaleSet, TransportError>>>,
  pub get_responses: Mutex<VecDeque<Result<RemoteScaleSet, TransportError>>>,
  pub delete_response: Mutex<Option<TransportError>>,
  pub calls: Mutex<Vec<Call>>,
}

impl FakeApi {
  /// Submit returns `id`, then each `get` reports the next state.
  pub fn accepting(id: &str, states: &[ProvisioningState]) -> Self {
    let api = FakeApi::default();
    *api.submit_response.lock().unwrap() = Some(Ok(remote_with_state(Some(id), ProvisioningState::Creating)));
    api
      .get_responses
      .lock()
      .unwrap()
      .extend(states.iter().cloned().map(|s| Ok(remote_with_state(Some(id), s))));
    api
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn get_count(&self) -> usize {
    self.calls().iter().filter(|c| matches!(c, Call::Get { .. })).count()
  }
}

/// Expanded sample spec as the provider would report it.
pub fn remote_with_state(id: Option<&str>, state: ProvisioningState) -> RemoteScaleSet {
  let mut remote = crate::expand::expand(&sample_spec()).unwrap();
  remote.id = id.map(str::to_string);
  remote.properties.get_or_insert_with(Default::default).provisioning_state = Some(state);
  remote
}

#[async_trait]
impl ScaleSetApi for FakeApi {
  async fn submit(
    &self,
    resource_group: &str,
    name: &str,
    _request: &RemoteScaleSet,
  ) -> Result<RemoteScaleSet, TransportError> {
    self.calls.lock().unwrap().push(Call::Submit {
      resource_group: resource_group.to_string(),
      name: name.to_string(),
    });
    self
      .submit_response
      .lock()
      .unwrap()
      .clone()
      .unwrap_or_else(|| Err(TransportError::Request("no scripted submit".to_string())))
  }

  async fn get(&self, resource_group: &str, name: &str) -> Result<RemoteScaleSet, TransportError> {
    self.calls.lock().unwrap().push(Call::Get {
      resource_group: resource_group.to_string(),
      name: name.to_string(),
    });
    let mut responses = self.get_responses.lock().unwrap();
    if responses.len() > 1 {
      responses.pop_front().unwrap()
    } else {
      responses
        .front()
        .cloned()
        .unwrap_or_else(|| Err(TransportError::NotFound(name.to_string())))
    }
  }

  async fn delete(&self, resource_group: &str, name: &str) -> Result<(), TransportError> {
    self.calls.lock().unwrap().push(Call::Delete {
      resource_group: resource_group.to_string(),
      name: name.to_string(),
    });
    match self.delete_response.lock().unwrap().clone() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}
