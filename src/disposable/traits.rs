/*!
 * Disposal Contracts
 *
 * Capability traits for resources and the adapter ports that let foreign
 * types take part without implementing them
 */

use super::entry::Entry;
use crate::core::LifecycleResult;

/// An object that must be released once its owner is finished with it
///
/// Only the first `dispose()` performs work; later calls are no-ops.
pub trait Disposable: Send + Sync {
    /// Release the resource
    fn dispose(&self);
}

/// A [`Disposable`] that can report whether it has already been released
pub trait CheckedDisposable: Disposable {
    /// Pure query; never triggers disposal
    fn is_disposed(&self) -> bool;
}

/// A holder of nested disposables
pub trait Manager: Disposable {
    /// Prune entries that are already finished
    ///
    /// Returns true once this manager is terminal.
    fn flush_disposed(&self) -> bool;

    /// Register an entry for teardown
    fn add(&self, entry: Entry) -> LifecycleResult<()>;

    /// Register several entries, preserving their order
    fn add_all(&self, entries: Vec<Entry>) -> LifecycleResult<()>;
}

/// Releases instances of a type that does not implement [`Disposable`]
pub trait Disposer<T: ?Sized>: Send + Sync {
    fn dispose_instance(&self, instance: &T);
}

impl<T: ?Sized, F> Disposer<T> for F
where
    F: Fn(&T) + Send + Sync,
{
    #[inline]
    fn dispose_instance(&self, instance: &T) {
        self(instance)
    }
}

/// Reports liveness for instances of a type that does not implement
/// [`CheckedDisposable`]
pub trait DisposeChecker<T: ?Sized>: Send + Sync {
    fn is_instance_disposed(&self, instance: &T) -> bool;
}

impl<T: ?Sized, F> DisposeChecker<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn is_instance_disposed(&self, instance: &T) -> bool {
        self(instance)
    }
}
