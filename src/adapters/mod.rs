/*!
 * Runtime Adapters
 * Registry handles for runtime-owned resources
 */

mod task;

pub use task::TaskHandle;
