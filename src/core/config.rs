/*!
 * Lifecycle Configuration
 *
 * Runtime configuration for collections and executors
 */

use serde::{Deserialize, Serialize};

/// Environment variable read by [`CollectionConfig::from_env`]
pub const LEAK_THRESHOLD_ENV: &str = "LIFECYCLE_LEAK_THRESHOLD";

/// What a collection does when pruning leaves it empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Collapse to the terminal state once a flush empties the collection
    Flushable,
    /// Only an explicit `dispose()` ends the collection (roots)
    Unflushable,
}

impl FlushPolicy {
    #[inline]
    pub const fn collapses_when_empty(self) -> bool {
        matches!(self, FlushPolicy::Flushable)
    }
}

/// Collection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Flush behaviour
    pub policy: FlushPolicy,
    /// Name used in logs and errors
    pub label: Option<String>,
    /// Warn once the live entry count reaches this many entries
    pub leak_warning_threshold: Option<usize>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::flushable()
    }
}

impl CollectionConfig {
    /// Configuration for a nested collection that self-collapses
    pub const fn flushable() -> Self {
        Self {
            policy: FlushPolicy::Flushable,
            label: None,
            leak_warning_threshold: None,
        }
    }

    /// Configuration for a root that anchors a whole tree
    pub const fn root() -> Self {
        Self {
            policy: FlushPolicy::Unflushable,
            label: None,
            leak_warning_threshold: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_leak_warning_threshold(mut self, threshold: usize) -> Self {
        self.leak_warning_threshold = Some(threshold);
        self
    }

    /// Apply overrides from the environment
    ///
    /// Environment variables:
    /// - LIFECYCLE_LEAK_THRESHOLD: entry count that triggers a leak warning
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if let Ok(raw) = std::env::var(LEAK_THRESHOLD_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(threshold) => self.leak_warning_threshold = Some(threshold),
                Err(e) => log::warn!("Ignoring {}={:?}: {}", LEAK_THRESHOLD_ENV, raw, e),
            }
        }
        self
    }

    /// Label for logs, falling back to the policy name
    pub fn display_label(&self) -> &str {
        match (&self.label, self.policy) {
            (Some(label), _) => label,
            (None, FlushPolicy::Flushable) => "collection",
            (None, FlushPolicy::Unflushable) => "root",
        }
    }
}

/// Thread-backed executor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Name given to the worker thread
    pub worker_name: String,
    /// Bounded queue length; `None` for unbounded
    pub channel_capacity: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            worker_name: "lifecycle-worker".to_string(),
            channel_capacity: None,
        }
    }
}

impl ExecutorConfig {
    #[inline]
    #[must_use]
    pub fn with_worker_name(mut self, name: impl Into<String>) -> Self {
        self.worker_name = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn bounded(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }
}
