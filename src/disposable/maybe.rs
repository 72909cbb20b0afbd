/*!
 * Conditional Utilities
 *
 * Operations on "maybe a resource" values and ordered lists of them. A missing
 * value counts as already disposed.
 */

use super::adapters::Adapters;
use super::entry::Entry;

/// Dispose the entry if there is one
#[inline]
pub fn dispose(entry: Option<&Entry>) {
    if let Some(entry) = entry {
        entry.dispose();
    }
}

/// Whether the entry is gone or reports itself disposed
#[inline]
pub fn is_disposed(entry: Option<&Entry>) -> bool {
    entry.map_or(true, Entry::is_disposed)
}

/// Whether the entry can be pruned: gone, disposed, or a nested manager that
/// reports terminal after flushing
#[inline]
pub fn is_flushable(entry: Option<&Entry>) -> bool {
    entry.map_or(true, Entry::flush)
}

/// Dispose an instance through its adapters
pub fn dispose_with<T: ?Sized>(instance: Option<&T>, adapters: &Adapters<T>) {
    if let Some(instance) = instance {
        adapters.dispose_instance(instance);
    }
}

/// Liveness of an instance through its adapters
pub fn is_disposed_with<T: ?Sized>(instance: Option<&T>, adapters: &Adapters<T>) -> bool {
    instance.map_or(true, |instance| adapters.is_instance_disposed(instance))
}

/// Dispose every entry, last registered first
pub fn dispose_list(entries: Option<Vec<Entry>>) {
    let Some(entries) = entries else {
        return;
    };
    for entry in entries.iter().rev() {
        entry.dispose();
    }
}

/// Prune flushable entries in place, keeping the order of the rest
///
/// Pruned entries are dropped, never disposed. Returns the number pruned.
pub fn flush_list(entries: &mut Vec<Entry>) -> usize {
    let before = entries.len();
    entries.retain(|entry| !entry.flush());
    before - entries.len()
}

/// Pause every entry, last registered first
pub fn pause_list(entries: &[Entry]) {
    for entry in entries.iter().rev() {
        entry.pause();
    }
}

/// Resume every entry, first registered first
pub fn resume_list(entries: &[Entry]) {
    for entry in entries {
        entry.resume();
    }
}
