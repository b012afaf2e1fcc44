//! The [`FileWatcher`] trait and subscription type.

use std::path::Path;

use tokio::sync::mpsc;

use crate::error::{WatchRuntimeError, WatchSetupError};
use crate::event::{ChangeEvent, WatchHandle};

/// Receiving end of a subscription's change events.
pub type ChangeEventReceiver = mpsc::UnboundedReceiver<ChangeEvent>;

/// Receiving end of a subscription's transient errors.
pub type WatchErrorReceiver = mpsc::UnboundedReceiver<WatchRuntimeError>;

/// An active watch on one file.
///
/// Both sequences are unbounded and end only after the watch is released
/// (or the backend shuts down). A subscription cannot be restarted: create a
/// new one after releasing it.
#[derive(Debug)]
pub struct Subscription {
    /// Change events for the watched path, in the order the backend reports them.
    pub events: ChangeEventReceiver,
    /// Non-fatal errors surfaced by the backend.
    pub errors: WatchErrorReceiver,
    /// Releases the watch when stopped or dropped.
    pub handle: WatchHandle,
}

/// Source of change notifications for a single file.
///
/// Implementations must be usable behind `Arc<dyn FileWatcher>` so that the
/// OS backend can be swapped for a mock in tests.
pub trait FileWatcher: Send + Sync {
    /// Start watching `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchSetupError`] if the path does not exist, cannot be
    /// opened, or the backend refuses the watch. No watch is held in that case.
    fn start(&self, path: &Path) -> Result<Subscription, WatchSetupError>;
}
