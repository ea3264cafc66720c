//! Parsing of provider resource identities.
//!
//! An identity is a `/`-separated path of key/value pairs:
//!
//! ```text
//! /subscriptions/<sub>/resourceGroups/<rg>/providers/<namespace>/<type>/<name>
//! ```
//!
//! The well-known keys (`subscriptions`, `resourceGroups`, `providers`) are
//! lifted into fields; every other pair lands in `path`. Keys are compared
//! case-insensitively because the provider is not consistent about casing.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
  #[error("resource id is empty")]
  Empty,

  #[error("resource id '{0}' has an odd number of segments")]
  OddSegments(String),

  #[error("resource id '{0}' has no resource group")]
  MissingResourceGroup(String),

  #[error("resource id '{id}' has no '{key}' segment")]
  MissingSegment { id: String, key: String },

  #[error("resource id '{id}' repeats key '{key}'")]
  DuplicateKey { id: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
  pub subscription_id: Option<String>,
  pub resource_group: String,
  pub provider: Option<String>,
  /// Remaining key/value pairs in the order-independent form they were found.
  pub path: BTreeMap<String, String>,
  raw: String,
}

impl ResourceId {
  pub fn parse(id: &str) -> Result<Self, ResourceIdError> {
    let trimmed = id.trim().trim_matches('/');
    if trimmed.is_empty() {
      return Err(ResourceIdError::Empty);
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.len() % 2 != 0 {
      return Err(ResourceIdError::OddSegments(id.to_string()));
    }

    let mut subscription_id = None;
    let mut resource_group = None;
    let mut provider = None;
    let mut path = BTreeMap::new();

    for pair in segments.chunks(2) {
      let (key, value) = (pair[0], pair[1]);

      let slot = if key.eq_ignore_ascii_case("subscriptions") {
        &mut subscription_id
      } else if key.eq_ignore_ascii_case("resourceGroups") {
        &mut resource_group
      } else if key.eq_ignore_ascii_case("providers") {
        &mut provider
      } else {
        if path.insert(key.to_string(), value.to_string()).is_some() {
          return Err(ResourceIdError::DuplicateKey {
            id: id.to_string(),
            key: key.to_string(),
          });
        }
        continue;
      };

      if slot.replace(value.to_string()).is_some() {
        return Err(ResourceIdError::DuplicateKey {
          id: id.to_string(),
          key: key.to_string(),
        });
      }
    }

    let resource_group = resource_group
      .filter(|rg| !rg.is_empty())
      .ok_or_else(|| ResourceIdError::MissingResourceGroup(id.to_string()))?;

    Ok(ResourceId {
      subscription_id,
      resource_group,
      provider,
      path,
      raw: id.to_string(),
    })
  }

  /// Value of a path key, ignoring ASCII case.
  pub fn path_value(&self, key: &str) -> Option<&str> {
    self
      .path
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(key))
      .map(|(_, v)| v.as_str())
  }

  /// Like [`path_value`](Self::path_value) but an absent key is an error.
  pub fn require(&self, key: &str) -> Result<&str, ResourceIdError> {
    self
      .path_value(key)
      .filter(|v| !v.is_empty())
      .ok_or_else(|| ResourceIdError::MissingSegment {
        id: self.raw.clone(),
        key: key.to_string(),
      })
  }

  pub fn as_str(&self) -> &str {
    &self.raw
  }
}

impl std::fmt::Display for ResourceId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.raw)
  }
}
