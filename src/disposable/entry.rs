/*!
 * Registry Entries
 *
 * Capabilities of a registered object, decided once at registration
 */

use super::traits::{CheckedDisposable, Disposable, Manager};
use crate::pausable::{Pausable, PausableManager};
use std::fmt;
use std::sync::Arc;

/// Disposal capability of an entry
#[derive(Clone)]
pub enum Disposal {
    /// Released on teardown, never pruned
    Plain(Arc<dyn Disposable>),
    /// Released on teardown, pruned once it reports disposed
    Checked(Arc<dyn CheckedDisposable>),
    /// A nested manager, flushed recursively and pruned once terminal
    Nested {
        manager: Arc<dyn Manager>,
        checked: Option<Arc<dyn CheckedDisposable>>,
    },
}

impl Disposal {
    #[inline]
    fn dispose(&self) {
        match self {
            Disposal::Plain(d) => d.dispose(),
            Disposal::Checked(d) => d.dispose(),
            Disposal::Nested { manager, .. } => manager.dispose(),
        }
    }

    #[inline]
    fn is_disposed(&self) -> bool {
        match self {
            Disposal::Plain(_) => false,
            Disposal::Checked(d) => d.is_disposed(),
            Disposal::Nested { checked, .. } => checked.as_ref().is_some_and(|c| c.is_disposed()),
        }
    }

    #[inline]
    fn flush(&self) -> bool {
        match self {
            Disposal::Plain(_) => false,
            Disposal::Checked(d) => d.is_disposed(),
            Disposal::Nested { manager, checked } => {
                manager.flush_disposed() || checked.as_ref().is_some_and(|c| c.is_disposed())
            }
        }
    }

    fn identity(&self) -> *const () {
        match self {
            Disposal::Plain(d) => Arc::as_ptr(d) as *const (),
            Disposal::Checked(d) => Arc::as_ptr(d) as *const (),
            Disposal::Nested { manager, .. } => Arc::as_ptr(manager) as *const (),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Disposal::Plain(_) => "plain",
            Disposal::Checked(_) => "checked",
            Disposal::Nested { .. } => "nested",
        }
    }
}

/// One registered object and the capabilities it was registered with
///
/// Cloning an entry clones the handles, not the resource, so the same entry
/// can sit in a pause tree and a disposal tree at once.
#[derive(Clone, Default)]
pub struct Entry {
    disposal: Option<Disposal>,
    pause: Option<Arc<dyn Pausable>>,
}

impl Entry {
    /// Build an entry from explicit capabilities
    pub fn new(disposal: Option<Disposal>, pause: Option<Arc<dyn Pausable>>) -> Self {
        Self { disposal, pause }
    }

    pub fn disposable<D: Disposable + 'static>(resource: Arc<D>) -> Self {
        Self::new(Some(Disposal::Plain(resource)), None)
    }

    pub fn checked<D: CheckedDisposable + 'static>(resource: Arc<D>) -> Self {
        Self::new(Some(Disposal::Checked(resource)), None)
    }

    pub fn manager<M: Manager + 'static>(manager: Arc<M>) -> Self {
        Self::new(
            Some(Disposal::Nested {
                manager,
                checked: None,
            }),
            None,
        )
    }

    /// A manager that can also report its own liveness
    pub fn checked_manager<M: Manager + CheckedDisposable + 'static>(manager: Arc<M>) -> Self {
        let checked: Arc<dyn CheckedDisposable> = manager.clone();
        Self::new(
            Some(Disposal::Nested {
                manager,
                checked: Some(checked),
            }),
            None,
        )
    }

    /// A pause-only entry; teardown ignores it
    pub fn pausable<P: Pausable + 'static>(resource: Arc<P>) -> Self {
        Self::new(None, Some(resource))
    }

    pub fn disposable_pausable<P: Disposable + Pausable + 'static>(resource: Arc<P>) -> Self {
        let pause: Arc<dyn Pausable> = resource.clone();
        Self::new(Some(Disposal::Plain(resource)), Some(pause))
    }

    pub fn checked_pausable<P: CheckedDisposable + Pausable + 'static>(resource: Arc<P>) -> Self {
        let pause: Arc<dyn Pausable> = resource.clone();
        Self::new(Some(Disposal::Checked(resource)), Some(pause))
    }

    /// A nested pause tree that is also a disposal tree
    pub fn pausable_manager<M: PausableManager + CheckedDisposable + 'static>(manager: Arc<M>) -> Self {
        let pause: Arc<dyn Pausable> = manager.clone();
        let mut entry = Self::checked_manager(manager);
        entry.pause = Some(pause);
        entry
    }

    #[inline]
    pub fn disposal(&self) -> Option<&Disposal> {
        self.disposal.as_ref()
    }

    #[inline]
    pub fn can_dispose(&self) -> bool {
        self.disposal.is_some()
    }

    #[inline]
    pub fn can_pause(&self) -> bool {
        self.pause.is_some()
    }

    #[inline]
    pub fn is_manager(&self) -> bool {
        matches!(self.disposal, Some(Disposal::Nested { .. }))
    }

    /// The same resource with only its disposal capability
    pub fn disposal_only(&self) -> Option<Entry> {
        self.disposal
            .as_ref()
            .map(|disposal| Entry::new(Some(disposal.clone()), None))
    }

    /// Whether both entries wrap the same object
    pub fn same_resource(&self, other: &Entry) -> bool {
        let lhs = self.identity();
        lhs.is_some() && lhs == other.identity()
    }

    fn identity(&self) -> Option<*const ()> {
        self.disposal
            .as_ref()
            .map(Disposal::identity)
            .or_else(|| self.pause.as_ref().map(|p| Arc::as_ptr(p) as *const ()))
    }

    pub(crate) fn dispose(&self) {
        if let Some(disposal) = &self.disposal {
            disposal.dispose();
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposal.as_ref().is_some_and(Disposal::is_disposed)
    }

    pub(crate) fn flush(&self) -> bool {
        self.disposal.as_ref().is_some_and(Disposal::flush)
    }

    pub(crate) fn pause(&self) {
        if let Some(pausable) = &self.pause {
            pausable.pause();
        }
    }

    pub(crate) fn resume(&self) {
        if let Some(pausable) = &self.pause {
            pausable.resume();
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("disposal", &self.disposal.as_ref().map(Disposal::kind))
            .field("pausable", &self.pause.is_some())
            .finish()
    }
}
