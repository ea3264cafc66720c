//! The remote scale-set API.
//!
//! [`ScaleSetApi`] is the capability every lifecycle operation receives
//! explicitly; nothing in this crate reaches for a shared client. Transport
//! failures are surfaced as [`TransportError`] exactly once: no layer in this
//! crate retries a failed call.
//!
//! # Submodules
//!
//! - [`model`] - Request/response wire model
//! - [`arm`] - HTTP implementation against the resource manager
//! - [`resource_id`] - Parsing of provider resource identities

pub mod arm;
pub mod model;
pub mod resource_id;

use async_trait::async_trait;
use thiserror::Error;

pub use arm::ArmClient;
pub use model::{ProvisioningState, RemoteScaleSet};
pub use resource_id::{ResourceId, ResourceIdError};

/// Failure of a single call to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
  /// The request could not be sent or no response arrived.
  #[error("request failed: {0}")]
  Request(String),

  /// The provider has no such resource.
  #[error("resource not found: {0}")]
  NotFound(String),

  /// The provider answered with a non-success status.
  #[error("provider returned HTTP {status}: {message}")]
  Status { status: u16, message: String },

  /// The response body was not a valid scale set.
  #[error("failed to decode response: {0}")]
  Decode(String),

  /// The response is well-formed but lacks a field the caller needs.
  #[error("response is missing {0}")]
  MissingField(&'static str),
}

/// Operations the provider exposes for scale sets.
#[async_trait]
pub trait ScaleSetApi: Send + Sync {
  /// Create or update a scale set. Returns the accepted resource, which
  /// carries its identity.
  async fn submit(
    &self,
    resource_group: &str,
    name: &str,
    request: &RemoteScaleSet,
  ) -> Result<RemoteScaleSet, TransportError>;

  /// Read the current state of a scale set.
  async fn get(&self, resource_group: &str, name: &str) -> Result<RemoteScaleSet, TransportError>;

  /// Request deletion. Completion is not awaited.
  async fn delete(&self, resource_group: &str, name: &str) -> Result<(), TransportError>;
}
