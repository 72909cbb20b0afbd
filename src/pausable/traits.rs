/*!
 * Pause Contracts
 */

use crate::disposable::Manager;
use std::marker::PhantomData;

/// An object that can suspend and later continue its work
///
/// Both operations are idempotent from the caller's point of view.
pub trait Pausable: Send + Sync {
    fn pause(&self);
    fn resume(&self);
}

/// Pauses instances of a type that does not implement [`Pausable`]
pub trait Pauser<T: ?Sized>: Send + Sync {
    fn pause_instance(&self, instance: &T);
    fn resume_instance(&self, instance: &T);
}

/// A [`Pauser`] built from a pair of closures
pub struct FnPauser<T: ?Sized, P, R> {
    pause: P,
    resume: R,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized, P, R> FnPauser<T, P, R>
where
    P: Fn(&T) + Send + Sync,
    R: Fn(&T) + Send + Sync,
{
    pub fn new(pause: P, resume: R) -> Self {
        Self {
            pause,
            resume,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, P, R> Pauser<T> for FnPauser<T, P, R>
where
    P: Fn(&T) + Send + Sync,
    R: Fn(&T) + Send + Sync,
{
    #[inline]
    fn pause_instance(&self, instance: &T) {
        (self.pause)(instance)
    }

    #[inline]
    fn resume_instance(&self, instance: &T) {
        (self.resume)(instance)
    }
}

/// A pause tree that is also a disposal manager
pub trait PausableManager: Manager + Pausable {}

impl<M: Manager + Pausable + ?Sized> PausableManager for M {}
