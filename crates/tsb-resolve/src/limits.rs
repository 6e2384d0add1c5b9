//! Centralized limits and thresholds for the resolution engine.
//!
//! Keeping these in one place prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit. The two
//! limits deliberately carry different failure policies: depth exhaustion
//! degrades to placeholders (partial fidelity over total failure), while
//! template-combination overflow is a hard error (a truncated union would
//! misrepresent the type).

/// Default maximum resolution depth.
///
/// Past this depth any type that would require further expansion degrades to
/// a terminal placeholder: `Unknown` in general, an empty `Object` for
/// object-like shapes. Builder output past a dozen nesting levels is not
/// useful, so this sits far below stack-overflow territory.
pub const MAX_RESOLUTION_DEPTH: u32 = 32;

/// Default maximum number of strings a template-literal expansion may
/// produce.
///
/// A template like `` `${A}-${B}-${C}` `` multiplies the cardinalities of its
/// placeholders; crossing this bound aborts the whole resolution of that
/// template with an error rather than emitting a truncated union.
pub const MAX_TEMPLATE_COMBINATIONS: usize = 2_000;

/// Maximum number of named dependencies followed from one entry point.
///
/// A runaway dependency walk (pathological fixture graphs, enormous
/// barrel-export surfaces) stops contributing new `dependencies` entries past
/// this count; the already-collected results are kept.
pub const MAX_DEPENDENCY_WALK: usize = 1_000;

/// Tunable knobs for one [`TypeResolver`](crate::TypeResolver).
#[derive(Debug, Clone, Copy)]
pub struct ResolverOptions {
    pub max_depth: u32,
    pub max_template_combinations: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            max_depth: MAX_RESOLUTION_DEPTH,
            max_template_combinations: MAX_TEMPLATE_COMBINATIONS,
        }
    }
}
