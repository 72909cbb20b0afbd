/*!
 * Executors
 *
 * Work submission targets for listeners and paused delivery. The pausable
 * variant buffers work while paused and drains it in submission order on
 * resume.
 */

use crate::core::ExecutorConfig;
use crate::disposable::{CheckedDisposable, Disposable, Entry};
use crate::pausable::Pausable;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

/// A unit of work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs submitted work
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    #[inline]
    fn execute(&self, task: Task) {
        (**self).execute(task)
    }
}

/// Runs work on the submitting thread
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    #[inline]
    fn execute(&self, task: Task) {
        task()
    }
}

/// Runs work on a single dedicated worker thread
///
/// Disposing closes the queue and joins the worker after it drains what was
/// already submitted. Work submitted after disposal is dropped. A task that
/// submits to its own full bounded queue runs the new work inline instead of
/// waiting on itself.
pub struct ThreadExecutor {
    sender: Mutex<Option<flume::Sender<Task>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    disposed: AtomicBool,
}

impl ThreadExecutor {
    pub fn new() -> io::Result<Self> {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> io::Result<Self> {
        let (sender, receiver) = match config.channel_capacity {
            Some(capacity) => flume::bounded::<Task>(capacity),
            None => flume::unbounded::<Task>(),
        };

        let worker = thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    task();
                }
                log::trace!("Executor worker exiting");
            })?;

        log::debug!("Started executor worker '{}'", config.worker_name);
        Ok(Self {
            sender: Mutex::new(Some(sender)),
            worker_id: worker.thread().id(),
            worker: Mutex::new(Some(worker)),
            disposed: AtomicBool::new(false),
        })
    }
}

impl Executor for ThreadExecutor {
    fn execute(&self, task: Task) {
        let sender = self.sender.lock().clone();
        let Some(sender) = sender else {
            log::debug!("Executor disposed; dropping task");
            return;
        };

        if thread::current().id() != self.worker_id {
            if sender.send(task).is_err() {
                log::warn!("Executor worker is gone; dropping task");
            }
            return;
        }

        match sender.try_send(task) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(task)) => {
                log::debug!("Executor queue full on its own worker; running inline");
                task();
            }
            Err(flume::TrySendError::Disconnected(_)) => {
                log::warn!("Executor worker is gone; dropping task");
            }
        }
    }
}

impl Disposable for ThreadExecutor {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        drop(self.sender.lock().take());

        let worker = self.worker.lock().take();
        let Some(worker) = worker else {
            return;
        };
        // A task disposing its own executor cannot join itself
        if self.worker_id == thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            log::error!("Executor worker panicked");
        }
    }
}

impl CheckedDisposable for ThreadExecutor {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl From<Arc<ThreadExecutor>> for Entry {
    fn from(executor: Arc<ThreadExecutor>) -> Self {
        Entry::checked(executor)
    }
}

/// Submission position, kept so a requeued task returns to its place
type Ticket = u64;

struct QueueInner {
    paused: bool,
    next_ticket: Ticket,
    queue: VecDeque<(Ticket, Task)>,
}

impl QueueInner {
    fn issue(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    /// Queue `task` at its submission position
    fn hold(&mut self, ticket: Ticket, task: Task) {
        let at = self.queue.partition_point(|(queued, _)| *queued < ticket);
        self.queue.insert(at, (ticket, task));
    }
}

struct QueueState<E> {
    inner: Mutex<QueueInner>,
    delegate: E,
}

impl<E: Executor + 'static> QueueState<E> {
    /// Hand `task` to the delegate, re-checking the pause flag when it runs
    fn dispatch(self: &Arc<Self>, ticket: Ticket, task: Task) {
        let state = self.clone();
        self.delegate.execute(Box::new(move || {
            let held = {
                let mut inner = state.inner.lock();
                if inner.paused {
                    inner.hold(ticket, task);
                    None
                } else {
                    Some(task)
                }
            };
            if let Some(task) = held {
                task();
            }
        }));
    }
}

/// Buffers work while paused
///
/// Work submitted while paused is queued; work already handed to the delegate
/// re-checks the flag when it runs and is queued again, ahead of anything
/// submitted after it, if a pause arrived in between. `resume()` drains the
/// queue in submission order.
pub struct PausableExecutor<E> {
    state: Arc<QueueState<E>>,
}

impl<E: Executor + 'static> PausableExecutor<E> {
    pub fn new(delegate: E) -> Self {
        Self {
            state: Arc::new(QueueState {
                inner: Mutex::new(QueueInner {
                    paused: false,
                    next_ticket: 0,
                    queue: VecDeque::new(),
                }),
                delegate,
            }),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.inner.lock().paused
    }

    /// Work held back by a pause
    pub fn queued_len(&self) -> usize {
        self.state.inner.lock().queue.len()
    }
}

impl<E: Executor + 'static> Executor for PausableExecutor<E> {
    fn execute(&self, task: Task) {
        let (ticket, held) = {
            let mut inner = self.state.inner.lock();
            let ticket = inner.issue();
            if inner.paused {
                inner.queue.push_back((ticket, task));
                (ticket, None)
            } else {
                (ticket, Some(task))
            }
        };
        if let Some(task) = held {
            self.state.dispatch(ticket, task);
        }
    }
}

impl<E: Executor + 'static> Pausable for PausableExecutor<E> {
    fn pause(&self) {
        self.state.inner.lock().paused = true;
    }

    fn resume(&self) {
        let drained: Vec<(Ticket, Task)> = {
            let mut inner = self.state.inner.lock();
            if !inner.paused {
                return;
            }
            inner.paused = false;
            inner.queue.drain(..).collect()
        };
        if !drained.is_empty() {
            log::trace!("Draining {} paused tasks", drained.len());
        }
        for (ticket, task) in drained {
            self.state.dispatch(ticket, task);
        }
    }
}

impl<E: Executor + 'static> From<Arc<PausableExecutor<E>>> for Entry {
    fn from(executor: Arc<PausableExecutor<E>>) -> Self {
        Entry::pausable(executor)
    }
}
