/*!
 * Settable Handles
 * A handle whose delegate is supplied after registration
 */

use super::entry::Entry;
use super::maybe;
use super::traits::{CheckedDisposable, Disposable};
use crate::core::{LifecycleError, LifecycleResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct SettableState {
    is_set: bool,
    delegate: Option<Entry>,
}

/// A [`CheckedDisposable`] whose delegate may be set once, later
///
/// Register the handle first, then set the delegate when the real resource
/// exists. If the handle was already disposed by then, the delegate is
/// disposed immediately.
#[derive(Default)]
pub struct SettableDisposable {
    disposed: AtomicBool,
    state: Mutex<SettableState>,
}

impl SettableDisposable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.state.lock().is_set
    }

    /// Supply the delegate
    pub fn set(&self, delegate: impl Into<Entry>) -> LifecycleResult<()> {
        let delegate = delegate.into();
        let late = {
            let mut state = self.state.lock();
            if state.is_set {
                return Err(LifecycleError::AlreadySet);
            }
            state.is_set = true;
            if self.disposed.load(Ordering::Acquire) {
                Some(delegate)
            } else {
                state.delegate = Some(delegate);
                None
            }
        };

        if let Some(delegate) = late {
            log::debug!("Settable handle was disposed before set; disposing delegate now");
            delegate.dispose();
        }
        Ok(())
    }
}

impl Disposable for SettableDisposable {
    fn dispose(&self) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }
        let delegate = {
            let mut state = self.state.lock();
            if self.disposed.swap(true, Ordering::AcqRel) {
                return;
            }
            state.delegate.take()
        };
        maybe::dispose(delegate.as_ref());
    }
}

impl CheckedDisposable for SettableDisposable {
    fn is_disposed(&self) -> bool {
        if self.disposed.load(Ordering::Acquire) {
            return true;
        }
        let delegate = {
            let state = self.state.lock();
            if !state.is_set {
                return false;
            }
            state.delegate.clone()
        };
        maybe::is_flushable(delegate.as_ref())
    }
}

impl From<Arc<SettableDisposable>> for Entry {
    fn from(handle: Arc<SettableDisposable>) -> Self {
        Entry::checked(handle)
    }
}
