//! Error taxonomy for the resolution engine.
//!
//! Only structurally malformed inputs and the template combination guard are
//! errors. Unsupported constructs never error: they degrade to `Unknown` or
//! an opaque `Generic` placeholder, and depth exhaustion degrades to terminal
//! placeholders. An error aborts only the offending subtree; sibling
//! resolution continues.

use thiserror::Error;

/// A failed resolution of one subtree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The host exposed a member but could not derive any type for it.
    #[error("property `{name}` has no derivable type")]
    UntypedProperty { name: String },

    /// A template-literal expansion would produce more strings than the
    /// configured maximum. Never truncated: a partial union would
    /// misrepresent the type.
    #[error(
        "template literal `{text}` expands to {combinations} strings, \
         exceeding the limit of {limit}"
    )]
    TemplateCombinationLimit {
        text: String,
        combinations: usize,
        limit: usize,
    },

    /// Generic-context bookkeeping violation (duplicate or unregistered
    /// parameter, self-referential constraint, merge conflict).
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// Invariant violations in [`GenericContext`](crate::GenericContext)
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("generic parameter name must be non-empty")]
    EmptyParamName,

    #[error("generic parameter `{name}` is already registered in this context")]
    DuplicateParam { name: String },

    #[error("generic parameter `{name}` has a self-referential constraint")]
    SelfReferentialConstraint { name: String },

    #[error("cannot bind `{name}`: not registered in this context chain")]
    UnboundParam { name: String },

    #[error("merge conflict on generic parameter `{name}`")]
    MergeConflict { name: String },
}

pub type ResolveResult<T> = Result<T, ResolveError>;
