/*!
 * One-Shot Runnables
 * Work items that run at most once and can be cancelled before they run
 */

use super::delegate::DisposeSlot;
use super::entry::Entry;
use super::traits::{CheckedDisposable, Disposable};
use std::sync::Arc;

/// A closure that runs at most once
///
/// Running or disposing marks it disposed. Disposing before it runs means it
/// never runs, which is how a registered listener is severed from a
/// computation that is still in flight.
pub struct DisposableRunnable {
    slot: DisposeSlot<Box<dyn FnOnce() + Send>>,
}

impl DisposableRunnable {
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            slot: DisposeSlot::new(Box::new(work)),
        }
    }

    /// Run the closure if it has not already run or been disposed
    ///
    /// Returns true when this call ran it.
    pub fn run(&self) -> bool {
        match self.slot.mark_disposed() {
            Some(work) => {
                work();
                true
            }
            None => false,
        }
    }
}

impl Disposable for DisposableRunnable {
    fn dispose(&self) {
        drop(self.slot.mark_disposed());
    }
}

impl CheckedDisposable for DisposableRunnable {
    fn is_disposed(&self) -> bool {
        self.slot.is_marked_disposed()
    }
}

impl From<Arc<DisposableRunnable>> for Entry {
    fn from(runnable: Arc<DisposableRunnable>) -> Self {
        Entry::checked(runnable)
    }
}
