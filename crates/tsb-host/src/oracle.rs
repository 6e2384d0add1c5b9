//! Structural assignability oracle.

use tsb_model::TypeNode;

/// Answers "is `source` assignable to `target`?" over normalized nodes.
///
/// Consumed only by the already-resolved (non-generic) arm of the
/// `Exclude`/`Extract` utility operations; everything else in the engine is
/// oracle-free. A real backend delegates to the host checker; the fixture
/// backend implements a small structural subset sufficient for literal
/// unions.
pub trait AssignabilityOracle {
    fn is_assignable(&self, source: &TypeNode, target: &TypeNode) -> bool;
}
