/*!
 * Weak Tracking Tests
 * Non-owning handles over shared and ownership-tracked objects
 */

use crate::support::{event_log, events, Probe};
use lifecycle_registry::{
    Adapters, CheckedDisposable, Disposable, DisposableCollection, FnPauser, LivenessTable,
    Manager, Pausable, PausableCollection, TrackedDisposable, WeakResource,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A foreign type that knows nothing about the registry
#[derive(Default)]
struct Receiver {
    registered: AtomicBool,
    unregister_calls: AtomicUsize,
}

impl Receiver {
    fn registered() -> Arc<Self> {
        let receiver = Arc::new(Self::default());
        receiver.registered.store(true, Ordering::SeqCst);
        receiver
    }

    fn unregister(&self) {
        self.unregister_calls.fetch_add(1, Ordering::SeqCst);
        self.registered.store(false, Ordering::SeqCst);
    }
}

fn receiver_adapters() -> Adapters<Receiver> {
    Adapters::new()
        .with_disposer(|r: &Receiver| r.unregister())
        .with_checker(|r: &Receiver| !r.registered.load(Ordering::SeqCst))
}

#[test]
fn test_dead_referent_reports_disposed() {
    let receiver = Receiver::registered();
    let handle = WeakResource::new(&receiver, receiver_adapters());
    assert!(!handle.is_disposed());

    drop(receiver);
    assert!(handle.is_disposed());
    handle.dispose();
}

#[test]
fn test_dispose_after_referent_gone_skips_adapter() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let receiver = Receiver::registered();
    let handle = WeakResource::with_disposer(&receiver, move |_: &Receiver| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    drop(receiver);
    handle.dispose();
    handle.dispose();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_registry_does_not_keep_referent_alive() {
    let receiver = Receiver::registered();
    let root = DisposableCollection::root();
    root.add(WeakResource::new(&receiver, receiver_adapters()).into_entry())
        .unwrap();

    assert_eq!(Arc::strong_count(&receiver), 1);
    drop(receiver);

    assert!(!root.flush_disposed());
    assert!(root.is_empty());
}

#[test]
fn test_live_referent_released_once() {
    let receiver = Receiver::registered();
    let root = DisposableCollection::root();
    root.add(WeakResource::new(&receiver, receiver_adapters()).into_entry())
        .unwrap();

    root.dispose();
    root.dispose();
    assert_eq!(receiver.unregister_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_externally_released_referent_is_pruned() {
    let receiver = Receiver::registered();
    let root = DisposableCollection::root();
    root.add(WeakResource::new(&receiver, receiver_adapters()).into_entry())
        .unwrap();

    receiver.unregister();
    assert!(!root.flush_disposed());
    assert!(root.is_empty());
    assert_eq!(receiver.unregister_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_native_and_adapter_checks_must_agree() {
    let log = event_log();
    let probe = Probe::new("native", &log);
    let adapter_says_done = Arc::new(AtomicBool::new(true));
    let flag = adapter_says_done.clone();
    let adapters = Adapters::new()
        .native_checked()
        .with_checker(move |_: &Probe| flag.load(Ordering::SeqCst));
    let handle = WeakResource::new(&probe, adapters);

    assert!(!handle.is_disposed());
    probe.finish();
    assert!(handle.is_disposed());

    adapter_says_done.store(false, Ordering::SeqCst);
    assert!(!handle.is_disposed());
}

#[test]
fn test_weak_pausable_skips_dead_referent() {
    let log = event_log();
    let probe = Probe::new("player", &log);
    let adapters = Adapters::new().native_checked().native_pausable();
    let tree = PausableCollection::root();
    tree.add(WeakResource::new(&probe, adapters).into_entry())
        .unwrap();

    tree.pause();
    tree.resume();
    assert_eq!(events(&log), vec!["pause player", "resume player"]);

    drop(probe);
    tree.pause();
    assert_eq!(events(&log).len(), 2);
}

#[test]
fn test_fn_pauser_adapter() {
    let receiver = Receiver::registered();
    let paused = Arc::new(AtomicBool::new(false));
    let (on_pause, on_resume) = (paused.clone(), paused.clone());
    let adapters = receiver_adapters().with_pauser(FnPauser::new(
        move |_: &Receiver| on_pause.store(true, Ordering::SeqCst),
        move |_: &Receiver| on_resume.store(false, Ordering::SeqCst),
    ));
    let handle = WeakResource::new(&receiver, adapters);

    handle.pause();
    assert!(paused.load(Ordering::SeqCst));
    handle.resume();
    assert!(!paused.load(Ordering::SeqCst));

    handle.dispose();
    handle.pause();
    assert!(!paused.load(Ordering::SeqCst));
}

#[test]
fn test_tracked_handle_follows_owner() {
    let table = LivenessTable::new();
    let released = Arc::new(AtomicUsize::new(0));
    let root = DisposableCollection::root();

    let kept = table.track();
    let counter = released.clone();
    root.add(Arc::new(TrackedDisposable::with_release(kept.handle(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })))
    .unwrap();

    let dropped = table.track();
    root.add(Arc::new(TrackedDisposable::new(dropped.handle())))
        .unwrap();
    drop(dropped);

    assert!(!root.flush_disposed());
    assert_eq!(root.len(), 1);

    root.dispose();
    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert!(!kept.handle().is_live());
    assert_eq!(table.live_count(), 0);
}
