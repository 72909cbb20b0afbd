/*!
 * Delegate Handles
 *
 * Strong holders that forget their delegate on disposal. `DisposeSlot` is the
 * check-and-set primitive every collection and handle in this crate builds on.
 */

use super::entry::Entry;
use super::traits::{CheckedDisposable, Disposable};
use crate::core::{LifecycleError, LifecycleResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of [`DisposeSlot::finish_if`]
#[derive(Debug)]
pub enum Finish<V> {
    /// The slot was already terminal
    AlreadyFinished,
    /// The slot is still live
    Kept,
    /// This call finished the slot and received the payload
    Finished(V),
}

/// A payload that is handed out exactly once
///
/// The flag gives lock-free fast paths; the mutex makes the transition and the
/// payload hand-off a single critical section. Only the caller that observes
/// "not yet disposed" under the lock receives the payload.
pub struct DisposeSlot<V> {
    disposed: AtomicBool,
    value: Mutex<Option<V>>,
}

impl<V> DisposeSlot<V> {
    pub fn new(value: V) -> Self {
        Self {
            disposed: AtomicBool::new(false),
            value: Mutex::new(Some(value)),
        }
    }

    /// Unsynchronized read of the flag, for fast returns
    #[inline]
    pub fn is_marked_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Run `f` against the live payload
    ///
    /// Returns `None` without calling `f` once the slot is disposed.
    pub fn with<R>(&self, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        if self.is_marked_disposed() {
            return None;
        }
        let mut guard = self.value.lock();
        guard.as_mut().map(f)
    }

    /// Run `f` against the live payload and finish the slot in the same
    /// critical section when `f` returns true
    pub fn finish_if(&self, f: impl FnOnce(&mut V) -> bool) -> Finish<V> {
        if self.is_marked_disposed() {
            return Finish::AlreadyFinished;
        }
        let mut guard = self.value.lock();
        let Some(value) = guard.as_mut() else {
            return Finish::AlreadyFinished;
        };
        if !f(value) {
            return Finish::Kept;
        }
        self.disposed.store(true, Ordering::Release);
        match guard.take() {
            Some(value) => Finish::Finished(value),
            None => Finish::AlreadyFinished,
        }
    }

    /// Mark the slot disposed and take the payload
    ///
    /// Every call after the first returns `None`.
    pub fn mark_disposed(&self) -> Option<V> {
        if self.is_marked_disposed() {
            return None;
        }
        let mut guard = self.value.lock();
        let value = guard.take();
        self.disposed.store(true, Ordering::Release);
        value
    }
}

impl<V: Clone> DisposeSlot<V> {
    /// Clone of the payload, or `None` once disposed
    pub fn get(&self) -> Option<V> {
        self.with(|value| value.clone())
    }
}

type Release<V> = Box<dyn FnOnce(V) + Send>;

struct Payload<V> {
    delegate: V,
    release: Option<Release<V>>,
}

/// Holds a strong delegate until disposed
///
/// Disposal hands the delegate to its release action (if one was given) and
/// then drops it, so a delegate with its own `Drop` is released by Rust's
/// normal ownership rules.
pub struct DelegateDisposable<V> {
    slot: DisposeSlot<Payload<V>>,
}

impl<V: Send> DelegateDisposable<V> {
    /// Forget `delegate` on disposal
    pub fn new(delegate: V) -> Self {
        Self {
            slot: DisposeSlot::new(Payload {
                delegate,
                release: None,
            }),
        }
    }

    /// Pass `delegate` to `release` on disposal
    pub fn with_release<F>(delegate: V, release: F) -> Self
    where
        F: FnOnce(V) + Send + 'static,
    {
        Self {
            slot: DisposeSlot::new(Payload {
                delegate,
                release: Some(Box::new(release)),
            }),
        }
    }

    /// Run `f` against the delegate without disposing it
    pub fn with_delegate<R>(&self, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.slot.with(|payload| f(&mut payload.delegate))
    }

    /// Like [`with_delegate`](Self::with_delegate) but fails once disposed
    pub fn try_with_delegate<R>(&self, f: impl FnOnce(&mut V) -> R) -> LifecycleResult<R> {
        self.with_delegate(f)
            .ok_or_else(|| LifecycleError::already_disposed("delegate"))
    }

    /// Mark disposed and take the delegate without running its release
    pub fn mark_disposed(&self) -> Option<V> {
        self.slot.mark_disposed().map(|payload| payload.delegate)
    }
}

impl<V: Clone + Send> DelegateDisposable<V> {
    pub fn delegate(&self) -> Option<V> {
        self.with_delegate(|delegate| delegate.clone())
    }

    /// Clone of the delegate, failing once disposed
    pub fn delegate_or_err(&self) -> LifecycleResult<V> {
        self.delegate()
            .ok_or_else(|| LifecycleError::already_disposed("delegate"))
    }
}

impl<V: Send> Disposable for DelegateDisposable<V> {
    fn dispose(&self) {
        let Some(Payload { delegate, release }) = self.slot.mark_disposed() else {
            return;
        };
        if let Some(release) = release {
            release(delegate);
        }
    }
}

impl<V: Send> CheckedDisposable for DelegateDisposable<V> {
    fn is_disposed(&self) -> bool {
        self.slot.is_marked_disposed()
    }
}

/// A release closure that runs at most once
///
/// Useful for unbind/unsubscribe calls.
pub struct FnDisposable {
    slot: DisposeSlot<Box<dyn FnOnce() + Send>>,
}

impl FnDisposable {
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            slot: DisposeSlot::new(Box::new(release)),
        }
    }
}

impl Disposable for FnDisposable {
    fn dispose(&self) {
        if let Some(release) = self.slot.mark_disposed() {
            release();
        }
    }
}

impl CheckedDisposable for FnDisposable {
    fn is_disposed(&self) -> bool {
        self.slot.is_marked_disposed()
    }
}

impl<V: Send + 'static> From<Arc<DelegateDisposable<V>>> for Entry {
    fn from(handle: Arc<DelegateDisposable<V>>) -> Self {
        Entry::checked(handle)
    }
}

impl From<Arc<FnDisposable>> for Entry {
    fn from(handle: Arc<FnDisposable>) -> Self {
        Entry::checked(handle)
    }
}
