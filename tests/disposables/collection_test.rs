/*!
 * Collection Tests
 * Teardown order, pruning, collapse and add-after-dispose
 */

use crate::support::{entry, event_log, events, Probe};
use lifecycle_registry::{
    maybe, Adapters, CheckedDisposable, CollectionConfig, Disposable, DisposableCollection, Entry,
    FnDisposable, LifecycleError, Manager, SettableDisposable, WeakResource,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_dispose_is_idempotent() {
    let released = Arc::new(AtomicUsize::new(0));
    let counter = released.clone();
    let handle = Arc::new(FnDisposable::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let root = DisposableCollection::root();
    root.add(handle.clone()).unwrap();

    for _ in 0..5 {
        root.dispose();
        handle.dispose();
    }

    assert_eq!(released.load(Ordering::SeqCst), 1);
    assert!(handle.is_disposed());
}

#[test]
fn test_lifo_teardown() {
    let log = event_log();
    let root = DisposableCollection::root();
    for name in ["h1", "h2", "h3"] {
        root.add(entry(&Probe::new(name, &log))).unwrap();
    }

    root.dispose();

    assert_eq!(events(&log), vec!["dispose h3", "dispose h2", "dispose h1"]);
}

#[test]
fn test_nested_ordering() {
    let log = event_log();
    let a = Probe::new("A", &log);
    let b = Probe::new("B", &log);

    let c = Arc::new(DisposableCollection::flushable());
    c.add(entry(&b)).unwrap();

    let m = DisposableCollection::root();
    m.add(entry(&a)).unwrap();
    m.add(c.clone()).unwrap();

    m.dispose();

    assert_eq!(events(&log), vec!["dispose B", "dispose A"]);
    assert!(c.is_disposed());
}

#[test]
fn test_flush_prunes_only_disposed_entries() {
    let log = event_log();
    let first = Probe::new("first", &log);
    let middle = Probe::new("middle", &log);
    let last = Probe::new("last", &log);

    let root = DisposableCollection::root();
    root.add_all([entry(&first), entry(&middle), entry(&last)])
        .unwrap();
    first.finish();
    last.finish();

    assert!(!root.flush_disposed());

    let remaining = root.entries();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].same_resource(&entry(&middle)));
    assert_eq!(first.calls(), 0);
    assert_eq!(last.calls(), 0);
    assert!(events(&log).is_empty());
}

#[test]
fn test_flushable_collapse_vs_root_persistence() {
    let log = event_log();
    let probes: Vec<_> = (0..3)
        .map(|i| Probe::new(&format!("p{}", i), &log))
        .collect();
    for probe in &probes {
        probe.finish();
    }

    let nested = DisposableCollection::flushable();
    let root = DisposableCollection::root();
    for probe in &probes {
        nested.add(entry(probe)).unwrap();
        root.add(entry(probe)).unwrap();
    }

    assert!(nested.flush_disposed());
    assert!(nested.is_disposed());
    assert!(nested.flush_disposed());

    assert!(!root.flush_disposed());
    assert!(root.is_empty());
    assert!(!root.is_disposed());
    assert!(!root.flush_disposed());
}

#[test]
fn test_flush_recurses_into_nested_managers() {
    let log = event_log();
    let inner_probe = Probe::new("inner", &log);
    let inner = Arc::new(DisposableCollection::flushable());
    inner.add(entry(&inner_probe)).unwrap();

    let root = DisposableCollection::root();
    root.add(inner.clone()).unwrap();

    assert!(!root.flush_disposed());
    assert_eq!(root.len(), 1);

    inner_probe.finish();
    assert!(!root.flush_disposed());
    assert!(root.is_empty());
    assert!(inner.is_disposed());
    assert_eq!(inner_probe.calls(), 0);
}

#[test]
fn test_add_after_dispose_fails() {
    let log = event_log();
    let root = DisposableCollection::new(CollectionConfig::root().with_label("activity"));
    root.dispose();

    let probe = Probe::new("late", &log);
    for _ in 0..3 {
        let err = root.add(entry(&probe)).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::AlreadyDisposed {
                label: "activity".to_string()
            }
        );
    }
    assert!(root.add_all(vec![entry(&probe)]).is_err());
    assert!(Manager::add(&root, entry(&probe)).is_err());
    assert_eq!(probe.calls(), 0);
}

#[test]
fn test_lifecycle_calls_on_terminal_objects_are_no_ops() {
    let root = DisposableCollection::flushable();
    root.dispose();
    root.dispose();
    assert!(root.flush_disposed());
    assert!(root.entries().is_empty());
}

#[test]
fn test_failing_adapter_propagates_after_transition() {
    let log = event_log();
    let survivor = Probe::new("survivor", &log);
    let target = Arc::new(());
    let failing = WeakResource::new(
        &target,
        Adapters::new().with_disposer(|_: &()| panic!("adapter failed")),
    );

    let root = DisposableCollection::root();
    root.add(entry(&survivor)).unwrap();
    root.add(failing.into_entry()).unwrap();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| root.dispose()));
    assert!(outcome.is_err());
    assert!(root.is_disposed());
    assert_eq!(survivor.calls(), 0);

    root.dispose();
    assert_eq!(survivor.calls(), 0);
}

#[test]
fn test_settable_registered_before_resource_exists() {
    let log = event_log();
    let root = DisposableCollection::root();
    let slot = Arc::new(SettableDisposable::new());
    root.add(slot.clone()).unwrap();

    let probe = Probe::new("late-bound", &log);
    slot.set(entry(&probe)).unwrap();
    root.dispose();

    assert_eq!(probe.calls(), 1);
    assert!(slot.is_disposed());
}

#[test]
fn test_maybe_helpers_treat_missing_as_disposed() {
    assert!(maybe::is_disposed(None));
    assert!(maybe::is_flushable(None));
    maybe::dispose(None);
    maybe::dispose_list(None);

    let log = event_log();
    let probe = Probe::new("x", &log);
    let held = entry(&probe);
    assert!(!maybe::is_disposed(Some(&held)));
    maybe::dispose(Some(&held));
    assert!(maybe::is_disposed(Some(&held)));
    assert!(maybe::is_flushable(Some(&Entry::checked(probe))));
}

#[test]
fn test_stats_serialize() {
    let root = DisposableCollection::root();
    let log = event_log();
    root.add(entry(&Probe::new("a", &log))).unwrap();

    let json = serde_json::to_value(root.stats()).unwrap();
    assert_eq!(json["registered"], 1);
    assert_eq!(json["live"], 1);
}

proptest! {
    #[test]
    fn prop_dispose_runs_in_reverse_registration_order(count in 1usize..24) {
        let log = event_log();
        let root = DisposableCollection::root();
        for i in 0..count {
            root.add(entry(&Probe::new(&i.to_string(), &log))).unwrap();
        }

        root.dispose();

        let expected: Vec<String> = (0..count).rev().map(|i| format!("dispose {}", i)).collect();
        prop_assert_eq!(events(&log), expected);
    }

    #[test]
    fn prop_flush_keeps_exactly_the_live_entries(finished in proptest::collection::vec(any::<bool>(), 0..32)) {
        let log = event_log();
        let root = DisposableCollection::root();
        let probes: Vec<_> = finished
            .iter()
            .enumerate()
            .map(|(i, _)| Probe::new(&i.to_string(), &log))
            .collect();
        for (probe, done) in probes.iter().zip(&finished) {
            root.add(entry(probe)).unwrap();
            if *done {
                probe.finish();
            }
        }

        prop_assert!(!root.flush_disposed());

        let kept: Vec<_> = probes
            .iter()
            .zip(&finished)
            .filter(|(_, done)| !**done)
            .map(|(probe, _)| entry(probe))
            .collect();
        let remaining = root.entries();
        prop_assert_eq!(remaining.len(), kept.len());
        for (held, expected) in remaining.iter().zip(&kept) {
            prop_assert!(held.same_resource(expected));
        }
        prop_assert!(probes.iter().all(|probe| probe.calls() == 0));
    }
}
