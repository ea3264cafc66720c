//! scaleset-lib: Reconciliation of virtual machine scale sets
//!
//! This crate turns a declarative scale-set description into provider
//! requests and drives them to a terminal state:
//! - `spec`: the desired-state model, its loader and drift computation
//! - `expand`: conversion between the spec and the provider's wire model
//! - `converge`: bounded polling until a provisioning state is terminal
//! - `lifecycle`: create-or-update, read, and delete against an injected API
//! - `remote`: the provider API trait and its HTTP implementation

pub mod consts;
pub mod converge;
pub mod expand;
pub mod lifecycle;
pub mod remote;
pub mod settings;
pub mod spec;
pub mod util;
