//! Loading a scale-set spec from disk.
//!
//! The file format is picked from the extension: `.json` is parsed as JSON,
//! everything else (`.yaml`, `.yml`, no extension) as YAML. The loaded spec is
//! validated before it is returned, so callers only ever see a spec that the
//! expander will accept.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::{ScaleSetSpec, SpecError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
  Yaml,
  Json,
}

impl SpecFormat {
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("json") => SpecFormat::Json,
      _ => SpecFormat::Yaml,
    }
  }
}

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("failed to read spec {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse YAML spec: {0}")]
  Yaml(#[from] serde_yaml::Error),

  #[error("failed to parse JSON spec: {0}")]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Invalid(#[from] SpecError),
}

/// Read, parse and validate the spec at `path`.
pub fn load_spec(path: &Path) -> Result<ScaleSetSpec, LoadError> {
  let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
    path: path.display().to_string(),
    source,
  })?;

  let format = SpecFormat::from_path(path);
  debug!(path = %path.display(), ?format, "loading spec");

  parse_spec(&content, format)
}

/// Parse and validate spec content.
pub fn parse_spec(content: &str, format: SpecFormat) -> Result<ScaleSetSpec, LoadError> {
  let spec: ScaleSetSpec = match format {
    SpecFormat::Yaml => serde_yaml::from_str(content)?,
    SpecFormat::Json => serde_json::from_str(content)?,
  };
  spec.validate()?;
  Ok(spec)
}
