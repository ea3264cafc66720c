//! Declarative scale-set specification.
//!
//! # Submodules
//!
//! - [`types`] - The typed desired-state model and element identities
//! - [`load`] - Reading and validating a spec file (YAML or JSON)
//! - [`diff`] - Comparing a desired spec with one flattened from remote state

pub mod diff;
pub mod load;
mod types;

pub use types::*;

use thiserror::Error;

/// Errors raised while validating a spec or mapping it to/from the remote model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
  /// The spec violates an invariant; nothing was sent to the provider.
  #[error("invalid spec: {0}")]
  InvalidSpec(String),

  /// The provider response lacks a field the spec requires.
  #[error("remote scale set is missing {0}")]
  IncompleteRemote(&'static str),

  /// A provider string does not belong to the closed enum it maps to.
  #[error("unknown {field} value '{value}'")]
  UnknownValue { field: &'static str, value: String },
}
