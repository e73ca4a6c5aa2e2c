use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Per-brand merge serialization
///
/// Two merges of the same brand never interleave their load, validation
/// and commit. Merges of different brands run in parallel.
#[derive(Clone, Default)]
pub struct BrandLocks {
    inner: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl BrandLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for a brand; hold `handle.lock()` for the critical section
    pub fn handle(&self, brand_id: i64) -> Arc<Mutex<()>> {
        self.inner.entry(brand_id).or_default().clone()
    }
}
