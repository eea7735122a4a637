//! Static type model
//!
//! Resolved type specs, the per-run interface registry, and assignment
//! compatibility rules.

pub mod rules;
pub mod type_def;

pub use type_def::{TypeRegistry, TypeSpec};
