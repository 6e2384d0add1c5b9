//! Top-level resolution results and type identities.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::node::TypeNode;

/// The identity of a declaration: where it lives and what it is called.
///
/// This is the cycle-detection key during resolution and the cache key for
/// completed resolutions. Two handles with the same identity are treated as
/// the same declaration even if the host hands out distinct handle objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeIdentity {
    /// Host-defined source location, typically a file path.
    pub source_location: String,
    pub name: String,
}

impl TypeIdentity {
    pub fn new(source_location: impl Into<String>, name: impl Into<String>) -> Self {
        TypeIdentity {
            source_location: source_location.into(),
            name: name.into(),
        }
    }
}

/// A fully resolved named type: its normalized model plus everything the
/// generator needs to emit imports for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedType {
    pub source_location: String,
    pub name: String,
    pub type_model: TypeNode,
    /// Names of other declarations referenced by the model, in first-seen
    /// order, deduplicated.
    pub imports: Vec<String>,
    /// Resolved dependency declarations. Deduplicated across the whole walk
    /// by a shared visited-name set, so a diamond dependency appears once.
    pub dependencies: Vec<Arc<ResolvedType>>,
}

impl ResolvedType {
    pub fn identity(&self) -> TypeIdentity {
        TypeIdentity::new(self.source_location.clone(), self.name.clone())
    }
}
