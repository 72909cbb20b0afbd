/*!
 * Shared test resources
 */

use lifecycle_registry::{CheckedDisposable, Disposable, Entry, Pausable};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Records every lifecycle call it receives
pub struct Probe {
    pub name: String,
    log: EventLog,
    disposed: AtomicBool,
    pub dispose_calls: AtomicUsize,
}

impl Probe {
    pub fn new(name: &str, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log: log.clone(),
            disposed: AtomicBool::new(false),
            dispose_calls: AtomicUsize::new(0),
        })
    }

    /// Mark finished without going through `dispose()`
    pub fn finish(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.dispose_calls.load(Ordering::SeqCst)
    }
}

impl Disposable for Probe {
    fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
        self.disposed.store(true, Ordering::SeqCst);
        self.log.lock().push(format!("dispose {}", self.name));
    }
}

impl CheckedDisposable for Probe {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl Pausable for Probe {
    fn pause(&self) {
        self.log.lock().push(format!("pause {}", self.name));
    }

    fn resume(&self) {
        self.log.lock().push(format!("resume {}", self.name));
    }
}

/// Register a probe with every capability it has
pub fn entry(probe: &Arc<Probe>) -> Entry {
    Entry::checked_pausable(probe.clone())
}

#[allow(dead_code)]
pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().clone()
}
