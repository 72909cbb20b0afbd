/*!
 * Pause/Resume Extension
 *
 * A parallel capability propagated through the same trees as disposal.
 * Resume runs first-registered first, restoring producers before consumers;
 * pause runs in the opposite order.
 */

mod collection;
mod executor;
mod traits;

pub use collection::PausableCollection;
pub use executor::{Executor, InlineExecutor, PausableExecutor, Task, ThreadExecutor};
pub use traits::{FnPauser, Pausable, PausableManager, Pauser};
