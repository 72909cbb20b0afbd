/*!
 * Async Task Handles
 *
 * Registry handles for tokio tasks with abort-on-dispose
 */

use crate::core::{LifecycleError, LifecycleResult};
use crate::disposable::{CheckedDisposable, Disposable, DisposeSlot, Entry};
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

/// A spawned task that is aborted when disposed
///
/// Reports disposed once the task has finished or been aborted.
///
/// # Example
///
/// ```ignore
/// let root = DisposableCollection::root();
/// let task = Arc::new(TaskHandle::spawn(async { poll_updates().await }));
/// root.add(task.clone())?;
///
/// // Aborted with the rest of the tree
/// root.dispose();
/// ```
pub struct TaskHandle<T> {
    handle: DisposeSlot<JoinHandle<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Spawn `future` on the current runtime
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::from_handle(tokio::spawn(future))
    }

    /// Track an existing task
    pub fn from_handle(handle: JoinHandle<T>) -> Self {
        Self {
            handle: DisposeSlot::new(handle),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .with(|handle| handle.is_finished())
            .unwrap_or(true)
    }

    /// Await the task's output, consuming the handle
    ///
    /// Fails if the handle was disposed first.
    pub async fn join(self) -> LifecycleResult<Result<T, JoinError>> {
        match self.handle.mark_disposed() {
            Some(handle) => Ok(handle.await),
            None => Err(LifecycleError::already_disposed("task")),
        }
    }
}

impl<T: Send + 'static> Disposable for TaskHandle<T> {
    fn dispose(&self) {
        if let Some(handle) = self.handle.mark_disposed() {
            if !handle.is_finished() {
                log::debug!("Aborting task on dispose");
            }
            handle.abort();
        }
    }
}

impl<T: Send + 'static> CheckedDisposable for TaskHandle<T> {
    fn is_disposed(&self) -> bool {
        self.handle.is_marked_disposed() || self.is_finished()
    }
}

impl<T: Send + 'static> From<Arc<TaskHandle<T>>> for Entry {
    fn from(task: Arc<TaskHandle<T>>) -> Self {
        Entry::checked(task)
    }
}
