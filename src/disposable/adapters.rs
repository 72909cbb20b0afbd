/*!
 * Adapter Bundles
 *
 * Caller-supplied ports plus the instance's own capabilities, fixed when the
 * bundle is built rather than probed on every call
 */

use super::traits::{CheckedDisposable, Disposable, DisposeChecker, Disposer};
use crate::pausable::{Pausable, Pauser};
use std::sync::Arc;

/// Adapters for instances of `T`
///
/// When both an adapter check and the instance's own check are present, the
/// instance counts as disposed only if both agree.
pub struct Adapters<T: ?Sized> {
    disposer: Option<Arc<dyn Disposer<T>>>,
    checker: Option<Arc<dyn DisposeChecker<T>>>,
    pauser: Option<Arc<dyn Pauser<T>>>,
    native_dispose: Option<fn(&T)>,
    native_check: Option<fn(&T) -> bool>,
    native_pause: Option<(fn(&T), fn(&T))>,
}

impl<T: ?Sized> Default for Adapters<T> {
    fn default() -> Self {
        Self {
            disposer: None,
            checker: None,
            pauser: None,
            native_dispose: None,
            native_check: None,
            native_pause: None,
        }
    }
}

impl<T: ?Sized> Clone for Adapters<T> {
    fn clone(&self) -> Self {
        Self {
            disposer: self.disposer.clone(),
            checker: self.checker.clone(),
            pauser: self.pauser.clone(),
            native_dispose: self.native_dispose,
            native_check: self.native_check,
            native_pause: self.native_pause,
        }
    }
}

impl<T: ?Sized + 'static> Adapters<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_disposer(mut self, disposer: impl Disposer<T> + 'static) -> Self {
        self.disposer = Some(Arc::new(disposer));
        self
    }

    #[must_use]
    pub fn with_checker(mut self, checker: impl DisposeChecker<T> + 'static) -> Self {
        self.checker = Some(Arc::new(checker));
        self
    }

    #[must_use]
    pub fn with_pauser(mut self, pauser: impl Pauser<T> + 'static) -> Self {
        self.pauser = Some(Arc::new(pauser));
        self
    }
}

impl<T: ?Sized> Adapters<T> {
    #[inline]
    pub fn can_pause(&self) -> bool {
        self.pauser.is_some() || self.native_pause.is_some()
    }

    /// Run the disposer, then the instance's own `dispose()`
    pub fn dispose_instance(&self, instance: &T) {
        if let Some(disposer) = &self.disposer {
            disposer.dispose_instance(instance);
        }
        if let Some(native) = self.native_dispose {
            native(instance);
        }
    }

    pub fn is_instance_disposed(&self, instance: &T) -> bool {
        let adapter = self
            .checker
            .as_ref()
            .map(|checker| checker.is_instance_disposed(instance));
        let native = self.native_check.map(|check| check(instance));
        match (adapter, native) {
            (Some(adapter), Some(native)) => adapter && native,
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => false,
        }
    }

    pub fn pause_instance(&self, instance: &T) {
        if let Some(pauser) = &self.pauser {
            pauser.pause_instance(instance);
        }
        if let Some((pause, _)) = self.native_pause {
            pause(instance);
        }
    }

    pub fn resume_instance(&self, instance: &T) {
        if let Some(pauser) = &self.pauser {
            pauser.resume_instance(instance);
        }
        if let Some((_, resume)) = self.native_pause {
            resume(instance);
        }
    }
}

impl<T: Disposable> Adapters<T> {
    /// Also call the instance's own `dispose()`
    #[must_use]
    pub fn native_disposable(mut self) -> Self {
        let dispose: fn(&T) = |instance| instance.dispose();
        self.native_dispose = Some(dispose);
        self
    }
}

impl<T: CheckedDisposable> Adapters<T> {
    /// Also call the instance's own `dispose()` and `is_disposed()`
    #[must_use]
    pub fn native_checked(mut self) -> Self {
        let check: fn(&T) -> bool = |instance| instance.is_disposed();
        self.native_check = Some(check);
        self.native_disposable()
    }
}

impl<T: Pausable> Adapters<T> {
    /// Also call the instance's own `pause()` and `resume()`
    #[must_use]
    pub fn native_pausable(mut self) -> Self {
        let pause: fn(&T) = |instance| instance.pause();
        let resume: fn(&T) = |instance| instance.resume();
        self.native_pause = Some((pause, resume));
        self
    }
}
