/*!
 * Core Module
 * Fundamental types, configuration and error handling
 */

pub mod config;
pub mod errors;

// Re-export for convenience
pub use config::{CollectionConfig, ExecutorConfig, FlushPolicy, LEAK_THRESHOLD_ENV};
pub use errors::*;
