/*!
 * Lifecycle Registry
 * Exactly-once disposal and ordered pause/resume for resource trees
 */

pub mod adapters;
pub mod core;
pub mod disposable;
pub mod future;
pub mod monitoring;
pub mod pausable;

// Re-exports
pub use crate::adapters::TaskHandle;
pub use crate::core::{CollectionConfig, ExecutorConfig, FlushPolicy, LifecycleError, LifecycleResult};
pub use disposable::{
    maybe, Adapters, CheckedDisposable, DelegateDisposable, Disposable, DisposableCollection,
    DisposableRunnable, DisposeChecker, Disposer, Entry, FnDisposable, LivenessTable,
    LivenessToken, Manager, SettableDisposable, TrackedDisposable, TrackedHandle, WeakResource,
};
pub use future::DisposableFuture;
pub use monitoring::{init_tracing, CollectionStats};
pub use pausable::{
    Executor, FnPauser, InlineExecutor, Pausable, PausableCollection, PausableExecutor,
    PausableManager, Pauser, ThreadExecutor,
};
