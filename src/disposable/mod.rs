/*!
 * Disposal Registry
 *
 * Contracts, handles and collections for exactly-once resource teardown.
 *
 * ## Handle Types
 *
 * - **DelegateDisposable**: Strong holder that forgets its delegate
 * - **FnDisposable**: One-shot release closure
 * - **SettableDisposable**: Delegate supplied after registration
 * - **DisposableRunnable**: Work item cancelled by disposal
 * - **WeakResource**: Non-owning handle with adapters
 * - **TrackedDisposable**: Handle over an ownership-tracked slot
 *
 * ## Ordering
 *
 * `dispose()` cascades last-registered first. `flush_disposed()` prunes
 * finished entries in place without disposing them, recursing into nested
 * managers.
 */

mod adapters;
mod collection;
mod delegate;
mod entry;
mod liveness;
pub mod maybe;
mod runnable;
mod settable;
mod traits;
mod weak;

pub use adapters::Adapters;
pub use collection::DisposableCollection;
pub use delegate::{DelegateDisposable, DisposeSlot, Finish, FnDisposable};
pub use entry::{Disposal, Entry};
pub use liveness::{LivenessTable, LivenessToken, SlotKey, TrackedDisposable, TrackedHandle};
pub use runnable::DisposableRunnable;
pub use settable::SettableDisposable;
pub use traits::{CheckedDisposable, DisposeChecker, Disposable, Disposer, Manager};
pub use weak::WeakResource;
