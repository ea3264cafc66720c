//! Persisted identity of a managed scale set.
//!
//! The identity returned by the provider is the only local state. It is saved
//! as a small JSON document next to the spec (or wherever the caller points):
//!
//! ```json
//! {
//!   "id": "/subscriptions/.../virtualMachineScaleSets/vmss1"
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
  /// Provider identity; `None` until a submit has been accepted.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
}

impl ResourceState {
  pub fn with_id(id: impl Into<String>) -> Self {
    Self { id: Some(id.into()) }
  }
}

#[derive(Debug, Error)]
pub enum StateError {
  #[error("failed to read state: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write state: {0}")]
  Write(#[source] io::Error),

  #[error("failed to parse state: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize state: {0}")]
  Serialize(#[source] serde_json::Error),
}

/// Save state, writing to a temp file first and renaming it into place.
pub fn save_state(path: &Path, state: &ResourceState) -> Result<(), StateError> {
  info!(path = %path.display(), id = ?state.id, "saving resource state");

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent).map_err(StateError::Write)?;
  }

  let content = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;

  let mut temp_name = path.as_os_str().to_owned();
  temp_name.push(".tmp");
  let temp_path = Path::new(&temp_name);

  fs::write(temp_path, &content).map_err(StateError::Write)?;
  fs::rename(temp_path, path).map_err(StateError::Write)?;

  Ok(())
}

/// Load state. A missing file is an empty state.
pub fn load_state(path: &Path) -> Result<ResourceState, StateError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      debug!(path = %path.display(), "state file not found");
      return Ok(ResourceState::default());
    }
    Err(e) => return Err(StateError::Read(e)),
  };

  serde_json::from_str(&content).map_err(StateError::Parse)
}
