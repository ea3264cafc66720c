//! Fingerprint-keyed sets of configuration elements.
//!
//! An [`ElementSet`] stores each member under its [`Fingerprint`], so two
//! configurations listing the same elements in a different order compare equal
//! and iterate identically. Members with equal fingerprints collapse into one.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::hash::{Fingerprint, SetElement};

#[derive(Debug, Clone, PartialEq)]
pub struct ElementSet<T> {
  items: BTreeMap<Fingerprint, T>,
}

impl<T> Default for ElementSet<T> {
  fn default() -> Self {
    Self { items: BTreeMap::new() }
  }
}

impl<T: SetElement> ElementSet<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert an element. Returns false if an element with the same fingerprint
  /// was already present (the newer element replaces it).
  pub fn insert(&mut self, element: T) -> bool {
    self.items.insert(element.fingerprint(), element).is_none()
  }

  pub fn contains(&self, element: &T) -> bool {
    self.items.contains_key(&element.fingerprint())
  }
}

impl<T> ElementSet<T> {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn get(&self, fingerprint: &Fingerprint) -> Option<&T> {
    self.items.get(fingerprint)
  }

  /// Members in fingerprint order.
  pub fn iter(&self) -> btree_map::Values<'_, Fingerprint, T> {
    self.items.values()
  }

  pub fn entries(&self) -> btree_map::Iter<'_, Fingerprint, T> {
    self.items.iter()
  }

  pub fn fingerprints(&self) -> impl Iterator<Item = Fingerprint> + '_ {
    self.items.keys().copied()
  }
}

impl<T: PartialEq> ElementSet<T> {
  /// Compare this (desired) set against an observed one.
  ///
  /// Members sharing a fingerprint but differing in fields outside the
  /// fingerprint are reported as `modified`.
  pub fn diff(&self, observed: &ElementSet<T>) -> SetDiff {
    let mut diff = SetDiff::default();

    for (fp, item) in &self.items {
      match observed.items.get(fp) {
        Some(other) if other == item => diff.unchanged.push(*fp),
        Some(_) => diff.modified.push(*fp),
        None => diff.added.push(*fp),
      }
    }

    for fp in observed.items.keys() {
      if !self.items.contains_key(fp) {
        diff.removed.push(*fp);
      }
    }

    diff
  }
}

impl<T: SetElement> FromIterator<T> for ElementSet<T> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut set = ElementSet::new();
    for element in iter {
      set.insert(element);
    }
    set
  }
}

impl<T> IntoIterator for ElementSet<T> {
  type Item = T;
  type IntoIter = btree_map::IntoValues<Fingerprint, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.into_values()
  }
}

impl<'a, T> IntoIterator for &'a ElementSet<T> {
  type Item = &'a T;
  type IntoIter = btree_map::Values<'a, Fingerprint, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.values()
  }
}

impl<T: Serialize> Serialize for ElementSet<T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.items.values())
  }
}

impl<'de, T: Deserialize<'de> + SetElement> Deserialize<'de> for ElementSet<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let items = Vec::<T>::deserialize(deserializer)?;
    Ok(items.into_iter().collect())
  }
}

/// Membership difference between a desired and an observed set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SetDiff {
  /// In desired, not observed.
  pub added: Vec<Fingerprint>,
  /// Observed, no longer desired.
  pub removed: Vec<Fingerprint>,
  /// Same fingerprint, different nested content.
  pub modified: Vec<Fingerprint>,
  /// Equal on both sides.
  pub unchanged: Vec<Fingerprint>,
}

impl SetDiff {
  pub fn is_empty(&self) -> bool {
    self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
  }
}
