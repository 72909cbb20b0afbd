/*!
 * Concurrency Tests
 * Exactly-once teardown under racing dispose, add and flush
 */

use lifecycle_registry::{Disposable, DisposableCollection, FnDisposable, Manager};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

fn counting_handle(counter: &Arc<AtomicUsize>) -> Arc<FnDisposable> {
    let counter = counter.clone();
    Arc::new(FnDisposable::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }))
}

#[test]
fn test_racing_dispose_releases_once() {
    const THREADS: usize = 16;

    for _ in 0..20 {
        let released = Arc::new(AtomicUsize::new(0));
        let root = Arc::new(DisposableCollection::root());
        root.add(counting_handle(&released)).unwrap();

        let barrier = Arc::new(Barrier::new(THREADS));
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                let root = root.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    root.dispose();
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(released.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn test_racing_add_and_dispose_never_leaks() {
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 200;

    let released = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));
    let root = Arc::new(DisposableCollection::root());
    let barrier = Arc::new(Barrier::new(WRITERS + 1));

    let writers: Vec<_> = (0..WRITERS)
        .map(|_| {
            let root = root.clone();
            let barrier = barrier.clone();
            let released = released.clone();
            let rejected = rejected.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..PER_WRITER {
                    if root.add(counting_handle(&released)).is_err() {
                        rejected.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    barrier.wait();
    thread::yield_now();
    root.dispose();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(
        released.load(Ordering::SeqCst) + rejected.load(Ordering::SeqCst),
        WRITERS * PER_WRITER
    );
    assert!(root.is_empty());
}

#[test]
fn test_racing_flush_and_dispose() {
    for _ in 0..50 {
        let released = Arc::new(AtomicUsize::new(0));
        let root = Arc::new(DisposableCollection::flushable());
        let handles: Vec<_> = (0..32).map(|_| counting_handle(&released)).collect();
        root.add_all(handles.iter().cloned()).unwrap();
        for handle in handles.iter().step_by(2) {
            handle.dispose();
        }

        let flusher = {
            let root = root.clone();
            thread::spawn(move || {
                root.flush_disposed();
            })
        };
        root.dispose();
        flusher.join().unwrap();

        assert_eq!(released.load(Ordering::SeqCst), 32);
        assert!(root.is_disposed());
    }
}

#[test]
fn test_nested_trees_dispose_concurrently() {
    let released = Arc::new(AtomicUsize::new(0));
    let root = Arc::new(DisposableCollection::root());
    let children: Vec<_> = (0..8)
        .map(|_| {
            let child = Arc::new(DisposableCollection::flushable());
            for _ in 0..10 {
                child.add(counting_handle(&released)).unwrap();
            }
            root.add(child.clone()).unwrap();
            child
        })
        .collect();

    let workers: Vec<_> = children
        .into_iter()
        .map(|child| thread::spawn(move || child.dispose()))
        .collect();
    root.dispose();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(released.load(Ordering::SeqCst), 80);
}
