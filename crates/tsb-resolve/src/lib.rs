//! Type resolution and normalization engine.
//!
//! This crate is the semantic core of the tsb builder generator: given a
//! [`tsb_host::TypeHandle`] to a type declaration, it walks the host's
//! semantic representation — objects, unions, intersections, arrays and
//! tuples, generics, inherited members, utility-type operations, template
//! literal types — and produces a finite, cycle-safe, generic-aware
//! [`tsb_model::TypeNode`] tree suitable for driving code generation.
//!
//! Design pillars:
//!
//! - **Termination**: a path-scoped visit guard cuts self-referential
//!   declarations with `Reference` placeholders, and a depth bound degrades
//!   anything deeper to terminal placeholders. Neither path errors.
//! - **Graceful degradation**: constructs the engine cannot model collapse to
//!   `Unknown` or an opaque `Generic` carrying the original source text;
//!   the only hard errors are a member with no derivable type and the
//!   template-literal combination guard.
//! - **Generic awareness**: open type parameters discovered anywhere in a
//!   declaration propagate outward through scoped [`GenericContext`]s, so a
//!   generated builder can stay generic until instantiation is known.
//! - **Determinism**: resolution is single-threaded and sequential; declared
//!   property order and union member order survive into the model.

mod cache;
mod context;
pub mod defaults;
mod error;
mod hooks;
pub mod limits;
mod properties;
mod recursion;
mod resolve;
mod template;
pub mod utility;

pub use cache::ResolutionCache;
pub use context::{GenericContext, MergePolicy};
pub use error::{ContextError, ResolveError, ResolveResult};
pub use hooks::{HookAction, HookError, PropertyHookContext, PropertyTransformHook};
pub use limits::ResolverOptions;
pub use resolve::TypeResolver;

#[cfg(test)]
mod tests;
