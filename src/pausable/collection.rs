/*!
 * Pausable Collections
 *
 * Pause trees layered onto the disposal registry. A standalone tree owns the
 * teardown of its entries. A connected tree forwards teardown to a disposal
 * root and keeps only a weak back-reference to it.
 */

use crate::core::{CollectionConfig, LifecycleError, LifecycleResult};
use crate::disposable::{maybe, CheckedDisposable, Disposable, DisposableCollection, Entry, Manager};
use crate::monitoring::CollectionStats;
use crate::pausable::Pausable;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Ordered pause tree
///
/// `pause()` runs last-registered first, `resume()` first-registered first.
pub struct PausableCollection {
    entries: DisposableCollection,
    root: Mutex<Option<Weak<dyn Manager>>>,
    connected: bool,
}

impl PausableCollection {
    /// Standalone tree that disposes its own entries
    pub fn root() -> Self {
        Self::standalone(CollectionConfig::root().with_label("pause root"))
    }

    pub fn standalone(config: CollectionConfig) -> Self {
        Self {
            entries: DisposableCollection::new(config),
            root: Mutex::new(None),
            connected: false,
        }
    }

    /// Tree whose disposal-capable entries are owned by `root`
    ///
    /// The new tree registers itself in `root`, so disposing the root tears
    /// it down too.
    pub fn connected<M: Manager + 'static>(root: &Arc<M>) -> LifecycleResult<Arc<Self>> {
        Self::connected_with(root, CollectionConfig::root().with_label("pause tree"))
    }

    pub fn connected_with<M: Manager + 'static>(
        root: &Arc<M>,
        config: CollectionConfig,
    ) -> LifecycleResult<Arc<Self>> {
        let root: Arc<dyn Manager> = root.clone();
        let tree = Arc::new(Self {
            entries: DisposableCollection::new(config),
            root: Mutex::new(Some(Arc::downgrade(&root))),
            connected: true,
        });
        root.add(Entry::checked_manager(tree.clone()))?;
        log::debug!("Connected pause tree '{}' to its disposal root", tree.label());
        Ok(tree)
    }

    pub fn label(&self) -> &str {
        self.entries.label()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.entries.is_disposed()
    }

    pub fn stats(&self) -> CollectionStats {
        self.entries.stats()
    }

    /// Register one entry
    ///
    /// In a connected tree, the entry's disposal capability goes to the root
    /// and only its pause capability stays here.
    pub fn add(&self, entry: impl Into<Entry>) -> LifecycleResult<()> {
        let entry = entry.into();
        if !self.connected {
            return self.entries.add(entry);
        }
        if self.is_disposed() {
            return Err(LifecycleError::already_disposed(self.label()));
        }

        // Forwarding happens outside our own lock
        let root = self.root.lock().as_ref().and_then(Weak::upgrade);
        let Some(root) = root else {
            return Err(LifecycleError::detached(self.label()));
        };
        if entry.can_pause() {
            self.entries.add(entry.clone())?;
        }
        match entry.disposal_only() {
            Some(disposal) => root.add(disposal),
            None => Ok(()),
        }
    }

    pub fn add_all<I>(&self, entries: I) -> LifecycleResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Entry>,
    {
        entries.into_iter().try_for_each(|entry| self.add(entry))
    }
}

impl Disposable for PausableCollection {
    fn dispose(&self) {
        if !self.connected {
            self.entries.dispose();
            return;
        }

        let root = self.root.lock().take();
        drop(root);
        if let Some(entries) = self.entries.take_entries() {
            log::debug!(
                "Detached pause tree '{}' ({} entries released to the root)",
                self.label(),
                entries.len()
            );
        }
    }
}

impl CheckedDisposable for PausableCollection {
    fn is_disposed(&self) -> bool {
        PausableCollection::is_disposed(self)
    }
}

impl Manager for PausableCollection {
    fn flush_disposed(&self) -> bool {
        self.entries.flush_disposed()
    }

    fn add(&self, entry: Entry) -> LifecycleResult<()> {
        PausableCollection::add(self, entry)
    }

    fn add_all(&self, entries: Vec<Entry>) -> LifecycleResult<()> {
        PausableCollection::add_all(self, entries)
    }
}

impl Pausable for PausableCollection {
    fn pause(&self) {
        let snapshot = self.entries.entries();
        log::trace!("Pausing '{}' ({} entries)", self.label(), snapshot.len());
        maybe::pause_list(&snapshot);
    }

    fn resume(&self) {
        let snapshot = self.entries.entries();
        log::trace!("Resuming '{}' ({} entries)", self.label(), snapshot.len());
        maybe::resume_list(&snapshot);
    }
}

impl From<Arc<PausableCollection>> for Entry {
    fn from(collection: Arc<PausableCollection>) -> Self {
        Entry::pausable_manager(collection)
    }
}
