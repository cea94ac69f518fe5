use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::raster::Raster;

/// Holds the only strong references to evictable rasters.
///
/// A [`View`](crate::View) marked evictable keeps a weak handle and hands its
/// strong one to the cache. The cache is a byte-bounded LRU: admitting a new
/// raster pushes out the least recently admitted ones until the total fits,
/// and dropping an entry here is what makes the owning view read "absent".
#[derive(Debug)]
pub struct RasterCache {
    capacity_bytes: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: VecDeque<Arc<Raster>>,
    bytes: usize,
}

impl CacheInner {
    fn remove_at(&mut self, index: usize) -> Option<Arc<Raster>> {
        let raster = self.entries.remove(index)?;
        self.bytes -= raster.byte_len();
        Some(raster)
    }

    fn position(&self, raster: &Arc<Raster>) -> Option<usize> {
        self.entries.iter().position(|r| Arc::ptr_eq(r, raster))
    }
}

impl RasterCache {
    pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a strong reference to `raster` as the most recent entry.
    ///
    /// A raster larger than the whole capacity is not kept at all.
    pub fn admit(&self, raster: Arc<Raster>) {
        let size = raster.byte_len();
        if size > self.capacity_bytes {
            debug!(size, capacity = self.capacity_bytes, "Raster exceeds cache capacity, dropping");
            return;
        }

        let mut inner = self.lock();
        if let Some(index) = inner.position(&raster) {
            inner.remove_at(index);
        }
        inner.bytes += size;
        inner.entries.push_back(raster);

        let mut evicted = 0usize;
        while inner.bytes > self.capacity_bytes {
            if inner.remove_at(0).is_none() {
                break;
            }
            evicted += 1;
        }
        if evicted > 0 {
            debug!(evicted, bytes = inner.bytes, "Evicted rasters from cache");
        }
    }

    /// Forget `raster` without evicting anything else. Returns whether it was held.
    pub fn release(&self, raster: &Arc<Raster>) -> bool {
        let mut inner = self.lock();
        match inner.position(raster) {
            Some(index) => inner.remove_at(index).is_some(),
            None => false,
        }
    }

    /// Drop every held raster, as under memory pressure. Returns how many were dropped.
    pub fn reclaim(&self) -> usize {
        let mut inner = self.lock();
        let count = inner.entries.len();
        inner.entries.clear();
        inner.bytes = 0;
        debug!(count, "Reclaimed raster cache");
        count
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn bytes(&self) -> usize {
        self.lock().bytes
    }
}

impl Default for RasterCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(side: u32) -> Arc<Raster> {
        Arc::new(Raster::new(side, side))
    }

    #[test]
    fn admit_within_capacity_keeps_all() {
        let cache = RasterCache::new(3 * 16);
        let (a, b, c) = (raster(2), raster(2), raster(2));
        cache.admit(a.clone());
        cache.admit(b.clone());
        cache.admit(c.clone());
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.bytes(), 48);
        assert_eq!(Arc::strong_count(&a), 2);
    }

    #[test]
    fn oldest_entry_evicted_first() {
        let cache = RasterCache::new(2 * 16);
        let (a, b, c) = (raster(2), raster(2), raster(2));
        let weak_a = Arc::downgrade(&a);
        cache.admit(a);
        cache.admit(b.clone());
        cache.admit(c.clone());
        assert_eq!(cache.len(), 2);
        assert!(weak_a.upgrade().is_none(), "oldest raster should be dropped");
        assert_eq!(Arc::strong_count(&b), 2);
        assert_eq!(Arc::strong_count(&c), 2);
    }

    #[test]
    fn readmitting_refreshes_recency() {
        let cache = RasterCache::new(2 * 16);
        let (a, b, c) = (raster(2), raster(2), raster(2));
        cache.admit(a.clone());
        cache.admit(b.clone());
        cache.admit(a.clone());
        cache.admit(c);
        assert_eq!(Arc::strong_count(&a), 2, "a was refreshed and survives");
        assert_eq!(Arc::strong_count(&b), 1, "b became the oldest and was evicted");
    }

    #[test]
    fn oversized_raster_not_admitted() {
        let cache = RasterCache::new(8);
        let big = raster(4);
        cache.admit(big.clone());
        assert!(cache.is_empty());
        assert_eq!(Arc::strong_count(&big), 1);
    }

    #[test]
    fn release_and_reclaim() {
        let cache = RasterCache::default();
        let (a, b) = (raster(2), raster(2));
        cache.admit(a.clone());
        cache.admit(b.clone());
        assert!(cache.release(&a));
        assert!(!cache.release(&a));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.reclaim(), 1);
        assert!(cache.is_empty());
        assert_eq!(cache.bytes(), 0);
        assert_eq!(Arc::strong_count(&b), 1);
    }
}
