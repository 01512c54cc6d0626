//! Modification-time validated size cache shared by scan workers.

use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Budget under which plain files are cached.
pub const FILE_BUDGET: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    depth_budget: u32,
    // Distinguishes folder sizes computed under different ignore lists
    filter: u64,
}

#[derive(Debug, Clone, Copy)]
struct CacheRecord {
    mtime: Option<SystemTime>,
    size: u64,
}

type Slot = Arc<Mutex<Option<CacheRecord>>>;

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Sizes keyed by `(path, depth budget)`, reused only while the path's
/// modification time is unchanged.
///
/// Each key owns its own lock: the check, the computation and the store for
/// one key happen under that lock, while unrelated keys proceed in parallel.
/// The map itself is unbounded; scope one instance per session if memory
/// matters.
#[derive(Debug, Default)]
pub struct SizeCache {
    slots: DashMap<CacheKey, Slot>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached size for `path` at `depth_budget`, or run `compute`
    /// and remember its result.
    ///
    /// A record is reused only if its modification-time snapshot equals the
    /// live one (a missing timestamp never matches). If the path cannot be
    /// stat'ed, or `compute` fails, the result is 0 and the stored record is
    /// left as it was.
    pub fn get_or_compute<F>(&self, path: &Path, depth_budget: u32, compute: F) -> u64
    where
        F: FnOnce() -> io::Result<u64>,
    {
        self.get_or_compute_filtered(path, depth_budget, 0, compute)
    }

    /// Like [`get_or_compute`](Self::get_or_compute), with records for the
    /// same path and budget kept apart per `filter` tag.
    pub fn get_or_compute_filtered<F>(
        &self,
        path: &Path,
        depth_budget: u32,
        filter: u64,
        compute: F,
    ) -> u64
    where
        F: FnOnce() -> io::Result<u64>,
    {
        let mtime = match fs::symlink_metadata(path) {
            Ok(meta) => meta.modified().ok(),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Cannot stat, counting as empty");
                return 0;
            }
        };

        let slot = self.slot(path, depth_budget, filter);
        // A poisoned slot only means another worker panicked mid-compute; the
        // record it guards was never overwritten, so it is still consistent.
        let mut record = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(cached) = *record {
            if mtime.is_some() && cached.mtime == mtime {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return cached.size;
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        match compute() {
            Ok(size) => {
                *record = Some(CacheRecord { mtime, size });
                size
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Size computation failed");
                0
            }
        }
    }

    fn slot(&self, path: &Path, depth_budget: u32, filter: u64) -> Slot {
        let key = CacheKey {
            path: path.to_path_buf(),
            depth_budget,
            filter,
        };
        // The shard guard is dropped at the end of this statement, before the
        // slot lock is taken.
        self.slots.entry(key).or_default().value().clone()
    }

    /// Number of keys ever touched, including ones whose computation failed.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
