/*!
 * Monitoring Module
 * Tracing setup and collection statistics
 */

mod stats;
mod tracer;

pub use stats::CollectionStats;
pub(crate) use stats::AtomicCollectionStats;
pub use tracer::{init_tracing, TRACE_JSON_ENV};
