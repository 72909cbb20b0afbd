/*!
 * Disposable Collections
 *
 * Ordered, thread-safe holders of registered entries. Collections nest into
 * trees: teardown cascades last-registered first, flushing prunes finished
 * entries recursively.
 */

use super::delegate::{DisposeSlot, Finish};
use super::entry::Entry;
use super::maybe;
use super::traits::{CheckedDisposable, Disposable, Manager};
use crate::core::{CollectionConfig, LifecycleError, LifecycleResult};
use crate::monitoring::{AtomicCollectionStats, CollectionStats};
use std::sync::Arc;

/// Ordered collection of entries with exactly-once teardown
///
/// # Example
///
/// ```rust
/// use lifecycle_registry::{Disposable, DisposableCollection, FnDisposable};
/// use std::sync::Arc;
///
/// let root = DisposableCollection::root();
/// root.add(Arc::new(FnDisposable::new(|| println!("unbind")))).unwrap();
/// root.dispose();
/// assert!(root.is_disposed());
/// ```
pub struct DisposableCollection {
    config: CollectionConfig,
    entries: DisposeSlot<Vec<Entry>>,
    stats: AtomicCollectionStats,
}

impl DisposableCollection {
    pub fn new(config: CollectionConfig) -> Self {
        Self {
            config,
            entries: DisposeSlot::new(Vec::new()),
            stats: AtomicCollectionStats::default(),
        }
    }

    /// Nested collection that collapses once a flush empties it
    pub fn flushable() -> Self {
        Self::new(CollectionConfig::flushable())
    }

    /// Root collection, ended only by `dispose()`
    pub fn root() -> Self {
        Self::new(CollectionConfig::root())
    }

    /// Collection pre-populated with `entries`, in order
    pub fn with_entries(config: CollectionConfig, entries: impl IntoIterator<Item = Entry>) -> Self {
        let entries: Vec<Entry> = entries.into_iter().collect();
        let collection = Self::new(config);
        collection.stats.add_registered(entries.len());
        collection.entries.with(|held| *held = entries);
        collection
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn label(&self) -> &str {
        self.config.display_label()
    }

    /// Number of held entries; zero once disposed
    pub fn len(&self) -> usize {
        self.entries.with(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_disposed(&self) -> bool {
        self.entries.is_marked_disposed()
    }

    pub fn stats(&self) -> CollectionStats {
        self.stats.snapshot(self.len())
    }

    /// Snapshot of the held entries in registration order
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.get().unwrap_or_default()
    }

    /// Register one entry
    ///
    /// Fails once the collection is disposed; the entry is then dropped
    /// without being disposed.
    pub fn add(&self, entry: impl Into<Entry>) -> LifecycleResult<()> {
        self.extend(vec![entry.into()])
    }

    /// Register several entries, preserving their order
    pub fn add_all<I>(&self, entries: I) -> LifecycleResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        self.extend(entries.into_iter().map(Into::into).collect())
    }

    fn extend(&self, mut incoming: Vec<Entry>) -> LifecycleResult<()> {
        let added = incoming.len();
        let held = self
            .entries
            .with(|entries| {
                entries.append(&mut incoming);
                entries.len()
            })
            .ok_or_else(|| LifecycleError::already_disposed(self.label()))?;

        self.stats.add_registered(added);
        if let Some(threshold) = self.config.leak_warning_threshold {
            if held >= threshold && held - added < threshold {
                log::warn!(
                    "Collection '{}' holds {} entries (threshold {}); entries may be leaking",
                    self.label(),
                    held,
                    threshold
                );
            }
        }
        Ok(())
    }

    /// Take the entries and mark disposed without disposing them
    pub(crate) fn take_entries(&self) -> Option<Vec<Entry>> {
        self.entries.mark_disposed()
    }
}

impl Default for DisposableCollection {
    fn default() -> Self {
        Self::new(CollectionConfig::default())
    }
}

impl Disposable for DisposableCollection {
    fn dispose(&self) {
        let Some(entries) = self.entries.mark_disposed() else {
            return;
        };
        let span = tracing::debug_span!("dispose", collection = self.label(), entries = entries.len());
        let _enter = span.enter();

        log::debug!(
            "Disposing collection '{}' ({} entries, LIFO)",
            self.label(),
            entries.len()
        );
        self.stats.add_disposed(entries.len());
        maybe::dispose_list(Some(entries));
    }
}

impl CheckedDisposable for DisposableCollection {
    fn is_disposed(&self) -> bool {
        DisposableCollection::is_disposed(self)
    }
}

impl Manager for DisposableCollection {
    fn flush_disposed(&self) -> bool {
        let collapses = self.config.policy.collapses_when_empty();
        let mut pruned = 0;
        let outcome = self.entries.finish_if(|entries| {
            pruned = maybe::flush_list(entries);
            collapses && entries.is_empty()
        });
        if pruned > 0 {
            self.stats.add_pruned(pruned);
            log::trace!("Pruned {} entries from '{}'", pruned, self.label());
        }

        match outcome {
            Finish::AlreadyFinished => true,
            Finish::Kept => false,
            Finish::Finished(_) => {
                log::trace!("Collection '{}' collapsed after flush", self.label());
                true
            }
        }
    }

    fn add(&self, entry: Entry) -> LifecycleResult<()> {
        DisposableCollection::add(self, entry)
    }

    fn add_all(&self, entries: Vec<Entry>) -> LifecycleResult<()> {
        DisposableCollection::add_all(self, entries)
    }
}

impl From<Arc<DisposableCollection>> for Entry {
    fn from(collection: Arc<DisposableCollection>) -> Self {
        Entry::checked_manager(collection)
    }
}
