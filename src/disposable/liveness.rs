/*!
 * Liveness Table
 *
 * Ownership-based liveness for objects that are not behind an `Arc`. An owner
 * holds a [`LivenessToken`]; registries hold [`TrackedHandle`]s that observe
 * the token's slot without keeping the object alive. Slots are recycled with
 * a generation bump so a stale handle never sees a newer owner.
 */

use super::delegate::DisposeSlot;
use super::entry::Entry;
use super::traits::{CheckedDisposable, Disposable};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Slot index plus the generation it was issued at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    alive: bool,
}

#[derive(Debug, Default)]
struct Slots {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Slots {
    fn allocate(&mut self) -> SlotKey {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            alive: true,
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    fn is_live(&self, key: SlotKey) -> bool {
        self.slots
            .get(key.index as usize)
            .is_some_and(|slot| slot.alive && slot.generation == key.generation)
    }

    fn kill(&mut self, key: SlotKey) -> bool {
        let Some(slot) = self.slots.get_mut(key.index as usize) else {
            return false;
        };
        if !slot.alive || slot.generation != key.generation {
            return false;
        }
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        true
    }
}

/// Shared table of liveness slots
#[derive(Debug, Default)]
pub struct LivenessTable {
    inner: Mutex<Slots>,
}

impl LivenessTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocate a slot for a new owner
    pub fn track(self: &Arc<Self>) -> LivenessToken {
        let key = self.inner.lock().allocate();
        LivenessToken {
            table: Arc::downgrade(self),
            key,
        }
    }

    /// Number of live slots
    pub fn live_count(&self) -> usize {
        let inner = self.inner.lock();
        inner.slots.len() - inner.free.len()
    }
}

/// Owner side of a slot; dropping it ends liveness
#[derive(Debug)]
pub struct LivenessToken {
    table: Weak<LivenessTable>,
    key: SlotKey,
}

impl LivenessToken {
    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// A non-owning handle to this slot
    pub fn handle(&self) -> TrackedHandle {
        TrackedHandle {
            table: self.table.clone(),
            key: self.key,
        }
    }
}

impl Drop for LivenessToken {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.inner.lock().kill(self.key);
        }
    }
}

/// Non-owning view of a slot
#[derive(Debug, Clone)]
pub struct TrackedHandle {
    table: Weak<LivenessTable>,
    key: SlotKey,
}

impl TrackedHandle {
    pub fn key(&self) -> SlotKey {
        self.key
    }

    /// False once the owner dropped its token, the slot was killed, or the
    /// table itself is gone
    pub fn is_live(&self) -> bool {
        let Some(table) = self.table.upgrade() else {
            return false;
        };
        let live = table.inner.lock().is_live(self.key);
        live
    }

    /// End liveness early; returns true if this call ended it
    pub fn kill(&self) -> bool {
        let Some(table) = self.table.upgrade() else {
            return false;
        };
        let killed = table.inner.lock().kill(self.key);
        killed
    }
}

/// A [`CheckedDisposable`] over a tracked slot
///
/// Disposed once the owner is gone or after the first `dispose()`, which runs
/// the release action only while the owner is still live.
pub struct TrackedDisposable {
    handle: TrackedHandle,
    release: DisposeSlot<Option<Box<dyn FnOnce() + Send>>>,
}

impl TrackedDisposable {
    pub fn new(handle: TrackedHandle) -> Self {
        Self {
            handle,
            release: DisposeSlot::new(None),
        }
    }

    pub fn with_release<F>(handle: TrackedHandle, release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            handle,
            release: DisposeSlot::new(Some(Box::new(release))),
        }
    }

    pub fn handle(&self) -> &TrackedHandle {
        &self.handle
    }
}

impl Disposable for TrackedDisposable {
    fn dispose(&self) {
        let Some(release) = self.release.mark_disposed() else {
            return;
        };
        if !self.handle.kill() {
            return;
        }
        if let Some(release) = release {
            release();
        }
    }
}

impl CheckedDisposable for TrackedDisposable {
    fn is_disposed(&self) -> bool {
        self.release.is_marked_disposed() || !self.handle.is_live()
    }
}

impl From<Arc<TrackedDisposable>> for Entry {
    fn from(tracked: Arc<TrackedDisposable>) -> Self {
        Entry::checked(tracked)
    }
}
