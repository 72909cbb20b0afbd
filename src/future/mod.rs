/*!
 * Disposable Results
 *
 * A completion slot whose listeners are one-shot handles in a nested,
 * flushable collection. Disposing the result severs every listener that has
 * not fired yet, so a computation still in flight completes into a no-op.
 */

use crate::core::{CollectionConfig, LifecycleError, LifecycleResult};
use crate::disposable::{
    CheckedDisposable, Disposable, DisposableCollection, DisposableRunnable, Entry, Manager,
};
use crate::pausable::Executor;
use parking_lot::{Condvar, Mutex};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

struct Listener {
    runnable: Arc<DisposableRunnable>,
    executor: Arc<dyn Executor>,
}

impl Listener {
    fn fire(self) {
        let runnable = self.runnable;
        self.executor.execute(Box::new(move || {
            runnable.run();
        }));
    }
}

enum Completion<T> {
    Pending(Vec<Listener>),
    Done(T),
    Cancelled,
}

struct Shared<T> {
    state: Mutex<Completion<T>>,
    ready: Condvar,
}

impl<T: Clone> Shared<T> {
    fn value(&self) -> Option<T> {
        match &*self.state.lock() {
            Completion::Done(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl<T: Send> Disposable for Shared<T> {
    fn dispose(&self) {
        let listeners = {
            let mut state = self.state.lock();
            if !matches!(*state, Completion::Pending(_)) {
                return;
            }
            std::mem::replace(&mut *state, Completion::Cancelled)
        };
        self.ready.notify_all();
        drop(listeners);
    }
}

impl<T: Send> CheckedDisposable for Shared<T> {
    fn is_disposed(&self) -> bool {
        !matches!(*self.state.lock(), Completion::Pending(_))
    }
}

/// A result that may be cancelled before it arrives
///
/// Flushing collapses it once the value has arrived and every listener has
/// fired.
pub struct DisposableFuture<T> {
    shared: Arc<Shared<T>>,
    slot: Entry,
    listeners: DisposableCollection,
}

impl<T: Clone + Send + Sync + 'static> DisposableFuture<T> {
    pub fn new() -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(Completion::Pending(Vec::new())),
            ready: Condvar::new(),
        });
        let listeners =
            DisposableCollection::new(CollectionConfig::flushable().with_label("future listeners"));
        let slot = Entry::checked(shared.clone());
        // Registered first so it is cancelled after every listener
        listeners
            .add(slot.clone())
            .unwrap_or_else(|e| log::error!("Fresh listener collection rejected entry: {}", e));
        Self {
            shared,
            slot,
            listeners,
        }
    }

    /// Deliver the value
    ///
    /// Returns false if the result was already completed or cancelled.
    pub fn complete(&self, value: T) -> bool {
        let listeners = {
            let mut state = self.shared.state.lock();
            if !matches!(*state, Completion::Pending(_)) {
                return false;
            }
            match std::mem::replace(&mut *state, Completion::Done(value)) {
                Completion::Pending(listeners) => listeners,
                _ => Vec::new(),
            }
        };
        self.shared.ready.notify_all();

        for listener in listeners {
            listener.fire();
        }
        true
    }

    /// Run `listener` with the value on `executor`
    ///
    /// Runs right away if the value is already here. Fails once the result
    /// has been disposed.
    pub fn add_listener<F>(&self, listener: F, executor: Arc<dyn Executor>) -> LifecycleResult<()>
    where
        F: FnOnce(T) + Send + 'static,
    {
        let shared: Weak<Shared<T>> = Arc::downgrade(&self.shared);
        let runnable = Arc::new(DisposableRunnable::new(move || {
            if let Some(value) = shared.upgrade().and_then(|shared| shared.value()) {
                listener(value);
            }
        }));

        if let Err(e) = self.listeners.add(runnable.clone()) {
            // A collapsed collection means the value arrived and was consumed
            if self.is_done() {
                Listener { runnable, executor }.fire();
                return Ok(());
            }
            return Err(e);
        }

        let done = {
            let mut state = self.shared.state.lock();
            if let Completion::Pending(pending) = &mut *state {
                pending.push(Listener { runnable, executor });
                return Ok(());
            }
            matches!(*state, Completion::Done(_))
        };

        if done {
            Listener { runnable, executor }.fire();
            Ok(())
        } else {
            runnable.dispose();
            Err(LifecycleError::already_disposed(self.listeners.label()))
        }
    }

    pub fn try_get(&self) -> Option<T> {
        self.shared.value()
    }

    pub fn is_done(&self) -> bool {
        matches!(*self.shared.state.lock(), Completion::Done(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(*self.shared.state.lock(), Completion::Cancelled)
    }

    /// Block until the value arrives, the result is cancelled, or `timeout`
    /// elapses
    pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.shared.state.lock();
        loop {
            match &*state {
                Completion::Done(value) => return Some(value.clone()),
                Completion::Cancelled => return None,
                Completion::Pending(_) => {}
            }
            if self.shared.ready.wait_until(&mut state, deadline).timed_out() {
                return match &*state {
                    Completion::Done(value) => Some(value.clone()),
                    _ => None,
                };
            }
        }
    }

    /// Listener entries still held
    ///
    /// The completion slot is pruned by the first flush after completion, so
    /// it is matched by identity rather than assumed to be present.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .entries()
            .iter()
            .filter(|entry| !entry.same_resource(&self.slot))
            .count()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for DisposableFuture<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Disposable for DisposableFuture<T> {
    fn dispose(&self) {
        self.listeners.dispose();
    }
}

impl<T: Clone + Send + Sync + 'static> CheckedDisposable for DisposableFuture<T> {
    fn is_disposed(&self) -> bool {
        self.listeners.is_disposed()
    }
}

impl<T: Clone + Send + Sync + 'static> Manager for DisposableFuture<T> {
    fn flush_disposed(&self) -> bool {
        self.listeners.flush_disposed()
    }

    fn add(&self, entry: Entry) -> LifecycleResult<()> {
        self.listeners.add(entry)
    }

    fn add_all(&self, entries: Vec<Entry>) -> LifecycleResult<()> {
        self.listeners.add_all(entries)
    }
}

impl<T: Clone + Send + Sync + 'static> From<Arc<DisposableFuture<T>>> for Entry {
    fn from(future: Arc<DisposableFuture<T>>) -> Self {
        Entry::checked_manager(future)
    }
}
