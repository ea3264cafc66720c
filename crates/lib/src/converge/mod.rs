//! Waiting for an accepted operation to reach a terminal provisioning state.
//!
//! After a mutating call is accepted, the provider reports progress through
//! the resource's provisioning state. [`wait_for_state`] polls a refresh
//! function and classifies every observed state:
//!
//! ```text
//!              +---------+  Creating / Updating
//! submitted -->| Pending |<-----------+
//!              +---------+            |
//!                  |  sleep >= min_poll_interval
//!                  +------------------+
//!                  |
//!     Succeeded    |   any other state        deadline passed while pending
//!   +--------------+--------------+-------------------+
//!   v                             v                   v
//! Target (Ok)            UnexpectedState (Err)     Timeout (Err)
//! ```
//!
//! Polls of one operation never overlap and a failed refresh is never
//! retried here. The overall timeout is the only way a wait is cancelled.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::consts::{DEFAULT_CONVERGE_TIMEOUT, DEFAULT_MIN_POLL_INTERVAL};
use crate::remote::{ProvisioningState, TransportError};

/// Timing policy for one wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergePolicy {
  /// Budget for the whole wait, measured from the first poll.
  pub timeout: Duration,
  /// Wait between two polls. The last wait is shortened to end at the deadline.
  pub min_poll_interval: Duration,
}

impl Default for ConvergePolicy {
  fn default() -> Self {
    Self {
      timeout: DEFAULT_CONVERGE_TIMEOUT,
      min_poll_interval: DEFAULT_MIN_POLL_INTERVAL,
    }
  }
}

/// How an observed provisioning state affects the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// The operation is still in flight.
  Pending,
  /// The operation finished successfully.
  Target,
  /// Terminal for the wait, and not a success.
  Unexpected,
}

impl Phase {
  pub fn of(state: &ProvisioningState) -> Phase {
    match state {
      ProvisioningState::Creating | ProvisioningState::Updating => Phase::Pending,
      ProvisioningState::Succeeded => Phase::Target,
      ProvisioningState::Failed
      | ProvisioningState::Canceled
      | ProvisioningState::Deleting
      | ProvisioningState::Other(_) => Phase::Unexpected,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvergeError {
  /// Reading the remote state failed; this is not a provisioning state.
  #[error("failed to refresh provisioning state: {0}")]
  Refresh(#[source] TransportError),

  #[error("unexpected provisioning state '{state}'")]
  UnexpectedState { state: ProvisioningState },

  #[error("timed out after {elapsed:?} waiting for a terminal state (last state '{last_state}')")]
  Timeout {
    last_state: ProvisioningState,
    elapsed: Duration,
  },
}

impl ConvergeError {
  /// The last provisioning state observed before the wait failed, if any.
  pub fn last_state(&self) -> Option<&ProvisioningState> {
    match self {
      ConvergeError::Refresh(_) => None,
      ConvergeError::UnexpectedState { state } => Some(state),
      ConvergeError::Timeout { last_state, .. } => Some(last_state),
    }
  }
}

/// Outcome of a successful wait.
#[derive(Debug, Clone)]
pub struct Converged<T> {
  /// Snapshot returned by the final refresh.
  pub value: T,
  pub polls: u32,
  pub elapsed: Duration,
}

/// Poll `refresh` until it reports a target state, an unexpected state, or
/// the policy's timeout passes while still pending.
///
/// `refresh` returns the remote snapshot together with its provisioning
/// state; a transport failure ends the wait immediately as
/// [`ConvergeError::Refresh`].
pub async fn wait_for_state<T, F, Fut>(policy: &ConvergePolicy, mut refresh: F) -> Result<Converged<T>, ConvergeError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<(T, ProvisioningState), TransportError>>,
{
  let start = Instant::now();
  // A timeout too large to add to the clock never expires.
  let deadline = start.checked_add(policy.timeout);
  let mut polls = 0u32;

  loop {
    let (value, state) = refresh().await.map_err(ConvergeError::Refresh)?;
    polls += 1;
    debug!(poll = polls, state = %state, "refreshed provisioning state");

    match Phase::of(&state) {
      Phase::Target => {
        return Ok(Converged {
          value,
          polls,
          elapsed: start.elapsed(),
        });
      }
      Phase::Unexpected => {
        warn!(poll = polls, state = %state, "unexpected provisioning state");
        return Err(ConvergeError::UnexpectedState { state });
      }
      Phase::Pending => {
        let now = Instant::now();
        if deadline.is_some_and(|d| now >= d) {
          let elapsed = now - start;
          warn!(poll = polls, state = %state, elapsed = ?elapsed, "timed out waiting for provisioning");
          return Err(ConvergeError::Timeout {
            last_state: state,
            elapsed,
          });
        }
        let wait = match deadline {
          Some(d) => policy.min_poll_interval.min(d - now),
          None => policy.min_poll_interval,
        };
        sleep(wait).await;
      }
    }
  }
}
