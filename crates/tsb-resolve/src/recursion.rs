//! Path-scoped visit guard for cycle detection and depth limiting.
//!
//! The guard tracks the identities on the *current* resolution path, not
//! everything ever seen: `leave()` removes a key when its subtree returns, so
//! sibling branches cannot cross-contaminate each other's cycle detection.
//! Re-entering an identity that is still on the path means the declaration is
//! self-referential and the caller must cut the cycle with a `Reference`
//! placeholder — never an error.
//!
//! In debug builds, dropping a guard with active entries panics, catching
//! forgotten `leave()` calls.

use std::hash::Hash;

use rustc_hash::FxHashSet;

/// Outcome of attempting to descend into a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Proceed; the caller must `leave()` with the same key afterwards.
    Entered,
    /// The key is already on the current path — cut with a reference.
    Cycle,
    /// The depth bound is reached — degrade to a terminal placeholder.
    DepthExceeded,
}

impl VisitOutcome {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Tracks the set of identities on the current resolution path.
pub struct VisitGuard<K: Hash + Eq + Clone> {
    visiting: FxHashSet<K>,
    max_depth: u32,
}

impl<K: Hash + Eq + Clone> VisitGuard<K> {
    pub fn new(max_depth: u32) -> Self {
        VisitGuard {
            visiting: FxHashSet::default(),
            max_depth,
        }
    }

    /// Try to descend into `key` at `depth`.
    pub fn enter(&mut self, key: K, depth: u32) -> VisitOutcome {
        if depth >= self.max_depth {
            return VisitOutcome::DepthExceeded;
        }
        if self.visiting.contains(&key) {
            return VisitOutcome::Cycle;
        }
        self.visiting.insert(key);
        VisitOutcome::Entered
    }

    /// Pop `key` off the path. Must be called exactly once per successful
    /// [`enter`](Self::enter).
    pub fn leave(&mut self, key: &K) {
        let was_present = self.visiting.remove(key);
        debug_assert!(
            was_present,
            "VisitGuard::leave() called with a key that is not on the path \
             (double-leave or leave without a matching enter)"
        );
    }

    /// Whether `key` is on the current path.
    #[inline]
    pub fn is_visiting(&self, key: &K) -> bool {
        self.visiting.contains(key)
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Clone> Drop for VisitGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.visiting.is_empty() {
            panic!(
                "VisitGuard dropped with {} entries still on the path \
                 (leaked enter() without matching leave())",
                self.visiting.len(),
            );
        }
    }
}
