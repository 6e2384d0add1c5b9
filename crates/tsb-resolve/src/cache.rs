//! Process-wide resolution cache.
//!
//! Keyed by [`TypeIdentity`] (source location + type name), populated lazily,
//! cleared only by an explicit [`reset`](ResolutionCache::reset). The cache
//! is unlocked across a whole resolution: two concurrent requests for the
//! same uncached key may each perform the resolution once. That is
//! acceptable — resolution is a pure function of its inputs, so the race
//! costs duplicated work, not incorrect results; last write wins.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use tsb_model::{ResolvedType, TypeIdentity};

/// Shared cache of completed resolutions.
#[derive(Default)]
pub struct ResolutionCache {
    map: DashMap<TypeIdentity, Arc<ResolvedType>>,
}

static GLOBAL: Lazy<ResolutionCache> = Lazy::new(ResolutionCache::default);

impl ResolutionCache {
    pub fn new() -> Self {
        ResolutionCache::default()
    }

    /// The process-wide instance.
    pub fn global() -> &'static ResolutionCache {
        &GLOBAL
    }

    pub fn get(&self, key: &TypeIdentity) -> Option<Arc<ResolvedType>> {
        self.map.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, resolved: Arc<ResolvedType>) {
        self.map.insert(resolved.identity(), resolved);
    }

    /// Drop every cached resolution.
    pub fn reset(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
