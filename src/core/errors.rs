/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle errors with serialization support
///
/// Only mutation of a finished object is an error. Every other lifecycle call
/// on a terminal object degrades to a no-op.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum LifecycleError {
    #[error("Tried to add to '{label}' after it was disposed")]
    #[diagnostic(
        code(lifecycle::already_disposed),
        help("The owning component has already torn down. Register resources before teardown, or create a new collection.")
    )]
    AlreadyDisposed { label: String },

    #[error("Settable handle already has a delegate")]
    #[diagnostic(
        code(lifecycle::already_set),
        help("A settable handle accepts exactly one delegate. Create a new handle instead.")
    )]
    AlreadySet,

    #[error("'{label}' is no longer connected to its disposal root")]
    #[diagnostic(
        code(lifecycle::detached),
        help("The disposal root was dropped before the connected pause tree. Keep the root alive for the component's lifetime.")
    )]
    Detached { label: String },
}

impl LifecycleError {
    #[inline]
    pub(crate) fn already_disposed(label: &str) -> Self {
        LifecycleError::AlreadyDisposed {
            label: label.to_string(),
        }
    }

    #[inline]
    pub(crate) fn detached(label: &str) -> Self {
        LifecycleError::Detached {
            label: label.to_string(),
        }
    }
}

/// Common result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
