//! Shared utilities.
//!
//! Fingerprint hashing and fingerprint-keyed element sets, plus test helpers.

pub mod hash;
pub mod set;

#[cfg(test)]
pub mod testutil;
