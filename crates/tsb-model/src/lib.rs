//! Type model for the tsb builder generator.
//!
//! This crate defines the normalized, serializable description of a source
//! type's shape — the tree of [`TypeNode`]s that the resolution engine emits
//! and the builder generator consumes. The model is deliberately plain data:
//! no handles into the host type system survive normalization, so a resolved
//! tree can be serialized, diffed, and re-rendered without the host present.
//!
//! - [`TypeNode`] — tagged union over every shape the engine can emit
//! - [`PropertyInfo`], [`GenericParam`], [`IndexSignature`] — object details
//! - [`ResolvedType`] — a named top-level result with its dependency closure
//! - [`merge`] — property-set merge utilities with their (deliberately
//!   asymmetric) duplicate-name policies

pub mod merge;
mod display;
mod node;
mod resolved;

pub use node::{
    GenericParam, IndexKeyKind, IndexSignature, LiteralValue, PropertyInfo, TypeNode,
};
pub use resolved::{ResolvedType, TypeIdentity};
