//! Create, read, and delete of a single scale set.
//!
//! Every operation receives the provider API explicitly and the caller's
//! [`ResourceState`] by mutable reference. The identity stored there is
//! assigned as soon as the provider accepts a submit, before waiting for
//! provisioning to finish, so a failed wait never orphans a resource. Callers
//! should persist the state whatever the outcome.
//!
//! Operations against one identity are expected to be serialized by the
//! caller; nothing here locks.

pub mod state;

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::SCALE_SET_TYPE;
use crate::converge::{ConvergeError, ConvergePolicy, wait_for_state};
use crate::expand::{expand, flatten};
use crate::remote::{ProvisioningState, RemoteScaleSet, ResourceId, ResourceIdError, ScaleSetApi, TransportError};
use crate::spec::diff::{SpecDiff, compute_diff};
use crate::spec::{ScaleSetSpec, SpecError};

pub use state::{ResourceState, StateError, load_state, save_state};

#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error(transparent)]
  Spec(#[from] SpecError),

  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error("error waiting for scale set '{name}' to become available: {source}")]
  Converge {
    name: String,
    #[source]
    source: ConvergeError,
  },

  #[error("invalid resource identity: {0}")]
  Identity(#[from] ResourceIdError),

  #[error("no resource identity recorded; nothing to {0}")]
  MissingIdentity(&'static str),
}

/// Result of a completed create-or-update.
#[derive(Debug, Clone)]
pub struct Applied {
  pub id: String,
  /// Remote snapshot from the final poll.
  pub remote: RemoteScaleSet,
  pub polls: u32,
  pub elapsed: Duration,
}

/// Submit `spec` and wait until the provider reports it provisioned.
///
/// Validation errors fail before any remote call. Once the submit is
/// accepted, `state.id` holds the returned identity even when the wait fails.
pub async fn create_or_update<C>(
  api: &C,
  spec: &ScaleSetSpec,
  state: &mut ResourceState,
  policy: &ConvergePolicy,
) -> Result<Applied, LifecycleError>
where
  C: ScaleSetApi + ?Sized,
{
  let request = expand(spec)?;
  info!(name = %spec.name, resource_group = %spec.resource_group, "submitting scale set");

  let accepted = api.submit(&spec.resource_group, &spec.name, &request).await?;
  let id = accepted.id.ok_or(TransportError::MissingField("id"))?;
  state.id = Some(id.clone());
  info!(id = %id, "scale set accepted");

  debug!(
    name = %spec.name,
    timeout = ?policy.timeout,
    min_poll_interval = ?policy.min_poll_interval,
    "waiting for scale set to become available"
  );
  let converged = wait_for_state(policy, || refresh(api, &spec.resource_group, &spec.name))
    .await
    .map_err(|source| LifecycleError::Converge {
      name: spec.name.clone(),
      source,
    })?;

  info!(id = %id, polls = converged.polls, elapsed = ?converged.elapsed, "scale set available");
  Ok(Applied {
    id,
    remote: converged.value,
    polls: converged.polls,
    elapsed: converged.elapsed,
  })
}

/// Read the current remote state together with its provisioning state.
///
/// A response without a provisioning state is a transport failure, not a state.
pub async fn refresh<C>(
  api: &C,
  resource_group: &str,
  name: &str,
) -> Result<(RemoteScaleSet, ProvisioningState), TransportError>
where
  C: ScaleSetApi + ?Sized,
{
  let remote = api.get(resource_group, name).await?;
  let state = remote
    .provisioning_state()
    .cloned()
    .ok_or(TransportError::MissingField("properties.provisioningState"))?;
  Ok((remote, state))
}

/// Re-derive the spec from remote truth.
///
/// Returns `Ok(None)` when no identity is recorded or when the provider no
/// longer has the resource; in the latter case the identity is cleared.
pub async fn read<C>(api: &C, state: &mut ResourceState) -> Result<Option<ScaleSetSpec>, LifecycleError>
where
  C: ScaleSetApi + ?Sized,
{
  let Some(id) = state.id.as_deref() else {
    debug!("no identity recorded, nothing to read");
    return Ok(None);
  };

  let resource_id = ResourceId::parse(id)?;
  let name = resource_id.require(SCALE_SET_TYPE)?;

  match api.get(&resource_id.resource_group, name).await {
    Ok(remote) => Ok(Some(flatten(&remote, &resource_id.resource_group)?)),
    Err(TransportError::NotFound(_)) => {
      warn!(id = %id, "scale set no longer exists, clearing identity");
      state.id = None;
      Ok(None)
    }
    Err(e) => Err(e.into()),
  }
}

/// Compare `spec` against remote truth.
///
/// Returns `Ok(None)` when there is nothing remote to compare against.
pub async fn drift<C>(
  api: &C,
  spec: &ScaleSetSpec,
  state: &mut ResourceState,
) -> Result<Option<SpecDiff>, LifecycleError>
where
  C: ScaleSetApi + ?Sized,
{
  let observed = read(api, state).await?;
  Ok(observed.map(|observed| compute_diff(spec, &observed)))
}

/// Request deletion of the recorded scale set.
///
/// Completion is not awaited. The identity is cleared only once the provider
/// accepted the request.
pub async fn delete<C>(api: &C, state: &mut ResourceState) -> Result<(), LifecycleError>
where
  C: ScaleSetApi + ?Sized,
{
  let id = state.id.as_deref().ok_or(LifecycleError::MissingIdentity("delete"))?;
  let resource_id = ResourceId::parse(id)?;
  let name = resource_id.require(SCALE_SET_TYPE)?;

  info!(resource_group = %resource_id.resource_group, name = %name, "deleting scale set");
  api.delete(&resource_id.resource_group, name).await?;

  state.id = None;
  Ok(())
}
