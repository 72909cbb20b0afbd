/*!
 * Weak Resource Handles
 *
 * Track an object without extending its lifetime. The handle holds a
 * `std::sync::Weak` plus adapters, so once the owner drops the last `Arc`
 * the handle reports disposed permanently.
 */

use super::adapters::Adapters;
use super::entry::Entry;
use super::maybe;
use super::traits::{CheckedDisposable, Disposable};
use crate::pausable::Pausable;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// A [`CheckedDisposable`] over a weakly referenced instance
///
/// Pausing and resuming are forwarded only while the instance is live.
pub struct WeakResource<T> {
    instance: Mutex<Option<Weak<T>>>,
    adapters: Adapters<T>,
}

impl<T: Send + Sync + 'static> WeakResource<T> {
    pub fn new(instance: &Arc<T>, adapters: Adapters<T>) -> Self {
        Self {
            instance: Mutex::new(Some(Arc::downgrade(instance))),
            adapters,
        }
    }

    /// Weak handle released through a single disposer
    pub fn with_disposer<D>(instance: &Arc<T>, disposer: D) -> Self
    where
        D: super::traits::Disposer<T> + 'static,
    {
        Self::new(instance, Adapters::new().with_disposer(disposer))
    }

    /// Strong reference to the instance if it is still alive
    pub fn upgrade(&self) -> Option<Arc<T>> {
        self.instance.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Wrap as a registry entry, pausable when the adapters can pause
    pub fn into_entry(self) -> Entry {
        let can_pause = self.adapters.can_pause();
        let handle = Arc::new(self);
        if can_pause {
            Entry::checked_pausable(handle)
        } else {
            Entry::checked(handle)
        }
    }

    fn live_instance(&self) -> Option<Arc<T>> {
        let instance = self.upgrade()?;
        if maybe::is_disposed_with(Some(instance.as_ref()), &self.adapters) {
            return None;
        }
        Some(instance)
    }
}

impl<T: Send + Sync + 'static> Disposable for WeakResource<T> {
    fn dispose(&self) {
        let instance = {
            let mut slot = self.instance.lock();
            let instance = slot.as_ref().and_then(Weak::upgrade);
            *slot = None;
            instance
        };
        let Some(instance) = instance else {
            return;
        };
        if self.adapters.is_instance_disposed(&instance) {
            return;
        }
        maybe::dispose_with(Some(instance.as_ref()), &self.adapters);
    }
}

impl<T: Send + Sync + 'static> CheckedDisposable for WeakResource<T> {
    fn is_disposed(&self) -> bool {
        let instance = self.upgrade();
        maybe::is_disposed_with(instance.as_deref(), &self.adapters)
    }
}

impl<T: Send + Sync + 'static> Pausable for WeakResource<T> {
    fn pause(&self) {
        if let Some(instance) = self.live_instance() {
            self.adapters.pause_instance(&instance);
        }
    }

    fn resume(&self) {
        if let Some(instance) = self.live_instance() {
            self.adapters.resume_instance(&instance);
        }
    }
}
