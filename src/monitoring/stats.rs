/*!
 * Lock-Free Collection Statistics
 * Atomic counters for registration, pruning and teardown
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a collection's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Entries ever registered
    pub registered: u64,
    /// Entries removed by flushes without being disposed
    pub pruned: u64,
    /// Entries handed to teardown
    pub disposed: u64,
    /// Entries currently held
    pub live: u64,
}

impl CollectionStats {
    /// Merge another snapshot into this one
    pub fn merge(&mut self, other: CollectionStats) {
        self.registered += other.registered;
        self.pruned += other.pruned;
        self.disposed += other.disposed;
        self.live += other.live;
    }
}

/// Atomic collection statistics
///
/// All operations use relaxed ordering. Counters are informational and never
/// drive lifecycle decisions.
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub(crate) struct AtomicCollectionStats {
    registered: AtomicU64,
    pruned: AtomicU64,
    disposed: AtomicU64,
}

impl AtomicCollectionStats {
    #[inline(always)]
    pub(crate) fn add_registered(&self, count: usize) {
        self.registered.fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn add_pruned(&self, count: usize) {
        self.pruned.fetch_add(count as u64, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn add_disposed(&self, count: usize) {
        self.disposed.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Counter values may not be consistent with each other under concurrent
    /// updates, but each individual value is accurate.
    #[inline]
    pub(crate) fn snapshot(&self, live: usize) -> CollectionStats {
        CollectionStats {
            registered: self.registered.load(Ordering::Relaxed),
            pruned: self.pruned.load(Ordering::Relaxed),
            disposed: self.disposed.load(Ordering::Relaxed),
            live: live as u64,
        }
    }
}
