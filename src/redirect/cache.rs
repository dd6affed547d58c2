//! Per-pad redirect index cache.
//!
//! Entries are keyed by [`PadId`] and hold a `Weak<Pad>`: the cache never
//! keeps a pad alive, and an entry whose pad has been dropped is purged the
//! next time the cache is touched.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::RedirectIndex;
use crate::content::{Pad, PadId};

type Entry = (Weak<Pad>, Arc<RedirectIndex>);

#[derive(Default)]
pub struct IndexCache {
    entries: Mutex<FxHashMap<PadId, Entry>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `pad`, building it with `build` on a miss.
    ///
    /// The index is built outside the lock. If two callers race on the same
    /// pad, the first inserted index wins and both get it.
    pub fn get_or_build(
        &self,
        pad: &Arc<Pad>,
        build: impl FnOnce(&Pad) -> RedirectIndex,
    ) -> Arc<RedirectIndex> {
        {
            let mut entries = self.entries.lock();
            purge_dead(&mut entries);
            if let Some((weak, index)) = entries.get(&pad.id())
                && std::ptr::eq(weak.as_ptr(), Arc::as_ptr(pad))
            {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(build(pad));
        let mut entries = self.entries.lock();
        let (_, index) = entries
            .entry(pad.id())
            .or_insert_with(|| (Arc::downgrade(pad), index));
        Arc::clone(index)
    }

    /// Drop the entry of a pad. Returns whether one existed.
    pub fn evict(&self, id: PadId) -> bool {
        self.entries.lock().remove(&id).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        purge_dead(&mut entries);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn purge_dead(entries: &mut FxHashMap<PadId, Entry>) {
    entries.retain(|_, (weak, _)| weak.strong_count() > 0);
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::fixture::demo_pad;
    use crate::env::Env;
    use crate::report::BufferReporter;
    use std::cell::Cell;

    fn env() -> Arc<Env> {
        Env::new(SiteConfig::default(), Arc::new(BufferReporter::new()))
    }

    fn build(pad: &Pad) -> RedirectIndex {
        RedirectIndex::build(pad, "redirect_from")
    }

    #[test]
    fn test_get_or_build_caches_per_pad() {
        let cache = IndexCache::new();
        let pad = demo_pad(env());
        let builds = Cell::new(0);

        let first = cache.get_or_build(&pad, |p| {
            builds.set(builds.get() + 1);
            build(p)
        });
        let second = cache.get_or_build(&pad, |p| {
            builds.set(builds.get() + 1);
            build(p)
        });

        assert_eq!(builds.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_new_pad_gets_new_index() {
        let cache = IndexCache::new();
        let env = env();
        let a = demo_pad(Arc::clone(&env));
        let b = demo_pad(env);

        let index_a = cache.get_or_build(&a, build);
        let index_b = cache.get_or_build(&b, build);

        assert!(!Arc::ptr_eq(&index_a, &index_b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_dropped_pad_is_purged() {
        let cache = IndexCache::new();
        let pad = demo_pad(env());
        let index = cache.get_or_build(&pad, build);
        assert_eq!(cache.len(), 1);

        drop(pad);
        assert_eq!(cache.len(), 0);
        // The index itself outlives its cache entry.
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_evict() {
        let cache = IndexCache::new();
        let pad = demo_pad(env());
        cache.get_or_build(&pad, build);

        assert!(cache.evict(pad.id()));
        assert!(!cache.evict(pad.id()));
        assert!(cache.is_empty());
    }
}
