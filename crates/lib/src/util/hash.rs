//! Identity fingerprints for unordered configuration elements.
//!
//! This module provides:
//! - `Fingerprint`: a 64-bit identity derived from an element's declared fields
//! - `FingerprintBuilder`: folds fields, in a fixed order, into a fingerprint
//! - `SetElement`: implemented by every element that lives in an unordered set
//!
//! A fingerprint only depends on the values of the fields an element chooses to
//! fold in, never on where the element appeared in the source configuration.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::consts::{FINGERPRINT_DELIMITER, FINGERPRINT_ESCAPE};

/// A content-derived identity for one member of an unordered set.
///
/// The value is the first 8 bytes (big endian) of the SHA-256 of the
/// delimiter-separated field buffer.
///
/// # Format
///
/// Displayed and serialized as a 16-character lowercase hexadecimal string,
/// e.g. `"1f3a9c00d2b4e871"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
  /// Fingerprint raw bytes as-is, without any field framing.
  pub fn of_bytes(data: &[u8]) -> Self {
    let digest = Sha256::digest(data);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    Fingerprint(u64::from_be_bytes(prefix))
  }

  pub fn to_hex(self) -> String {
    hex::encode(self.0.to_be_bytes())
  }
}

impl std::fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.to_hex())
  }
}

impl Serialize for Fingerprint {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_hex())
  }
}

impl<'de> Deserialize<'de> for Fingerprint {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    let mut bytes = [0u8; 8];
    hex::decode_to_slice(&raw, &mut bytes).map_err(serde::de::Error::custom)?;
    Ok(Fingerprint(u64::from_be_bytes(bytes)))
  }
}

/// Accumulates an element's fields into the byte sequence that gets hashed.
///
/// Every present field is written followed by the delimiter. Absent optional
/// fields are skipped entirely, so `None` and `Some("")` produce different
/// buffers (`"a-2-"` versus `"a--2-"`). Delimiters and backslashes inside a
/// value are escaped with a backslash.
///
/// # Example
///
/// ```
/// use scaleset_lib::util::hash::FingerprintBuilder;
///
/// let fp = FingerprintBuilder::new()
///   .field("Standard_A0")
///   .optional_field(Some("Standard"))
///   .field(2)
///   .finish();
/// assert_eq!(fp.to_hex().len(), 16);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FingerprintBuilder {
  buf: String,
}

impl FingerprintBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn field(mut self, value: impl Display) -> Self {
    for c in value.to_string().chars() {
      if c == FINGERPRINT_DELIMITER || c == FINGERPRINT_ESCAPE {
        self.buf.push(FINGERPRINT_ESCAPE);
      }
      self.buf.push(c);
    }
    self.buf.push(FINGERPRINT_DELIMITER);
    self
  }

  pub fn optional_field<T: Display>(self, value: Option<T>) -> Self {
    match value {
      Some(v) => self.field(v),
      None => self,
    }
  }

  /// The framed buffer that [`finish`](Self::finish) hashes.
  pub fn as_str(&self) -> &str {
    &self.buf
  }

  pub fn finish(self) -> Fingerprint {
    Fingerprint::of_bytes(self.buf.as_bytes())
  }
}

/// An element that can be a member of an [`ElementSet`](crate::util::set::ElementSet).
pub trait SetElement {
  fn fingerprint(&self) -> Fingerprint;
}

/// Plain strings (subnet ids, VHD container URIs) are hashed by their bytes alone.
impl SetElement for String {
  fn fingerprint(&self) -> Fingerprint {
    Fingerprint::of_bytes(self.as_bytes())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fingerprint_is_deterministic() {
    let a = FingerprintBuilder::new().field("a").field(2).finish();
    let b = FingerprintBuilder::new().field("a").field(2).finish();
    assert_eq!(a, b);
  }

  #[test]
  fn buffer_uses_declared_order_and_delimiter() {
    let builder = FingerprintBuilder::new().field("vmss").field(true);
    assert_eq!(builder.as_str(), "vmss-true-");
  }

  #[test]
  fn absent_optional_is_omitted_not_padded() {
    let absent = FingerprintBuilder::new().field("a").optional_field(None::<&str>).field(2);
    let empty = FingerprintBuilder::new().field("a").optional_field(Some("")).field(2);

    assert_eq!(absent.as_str(), "a-2-");
    assert_eq!(empty.as_str(), "a--2-");
    assert_ne!(absent.finish(), empty.finish());
  }

  #[test]
  fn delimiter_inside_value_is_escaped() {
    let trailing = FingerprintBuilder::new().field("a-").optional_field(None::<&str>).field(2);
    let empty = FingerprintBuilder::new().field("a").optional_field(Some("")).field(2);

    assert_eq!(trailing.as_str(), "a\\--2-");
    assert_eq!(empty.as_str(), "a--2-");
    assert_ne!(trailing.finish(), empty.finish());

    let slash = FingerprintBuilder::new().field("a\\").field("b");
    assert_eq!(slash.as_str(), "a\\\\-b-");
  }

  #[test]
  fn field_order_matters() {
    let ab = FingerprintBuilder::new().field("a").field("b").finish();
    let ba = FingerprintBuilder::new().field("b").field("a").finish();
    assert_ne!(ab, ba);
  }

  #[test]
  fn hex_is_sixteen_chars() {
    let fp = Fingerprint::of_bytes(b"hello world");
    assert_eq!(fp.to_hex().len(), 16);
    // First 8 bytes of sha256("hello world")
    assert_eq!(fp.to_hex(), "b94d27b9934d3e08");
  }

  #[test]
  fn string_elements_hash_raw_bytes() {
    let uri = "https://acct.blob.core.windows.net/vhds".to_string();
    assert_eq!(uri.fingerprint(), Fingerprint::of_bytes(uri.as_bytes()));
  }

  #[test]
  fn serializes_as_hex_string() {
    let fp = Fingerprint(0x1f3a9c00d2b4e871);
    let json = serde_json::to_string(&fp).unwrap();
    assert_eq!(json, "\"1f3a9c00d2b4e871\"");
    assert_eq!(serde_json::from_str::<Fingerprint>(&json).unwrap(), fp);
    assert!(serde_json::from_str::<Fingerprint>("\"xyz\"").is_err());
  }
}
