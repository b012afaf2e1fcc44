//! Change event types and the watch release handle.

use std::fmt;
use std::path::PathBuf;

use notify::EventKind;
use notify::event::ModifyKind;

/// Kind of file-system operation observed on the watched path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content was modified.
    Write,
    /// File was created.
    Create,
    /// File was removed.
    Remove,
    /// File was renamed (either side of the rename).
    Rename,
    /// File metadata (permissions, timestamps) changed.
    Chmod,
}

impl ChangeKind {
    /// Map a `notify` event kind to a change kind.
    ///
    /// Returns `None` for access notifications and unclassified events.
    #[must_use]
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any) => Some(Self::Write),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(Self::Chmod),
            EventKind::Modify(ModifyKind::Name(_)) => Some(Self::Rename),
            EventKind::Create(_) => Some(Self::Create),
            EventKind::Remove(_) => Some(Self::Remove),
            EventKind::Modify(ModifyKind::Other)
            | EventKind::Access(_)
            | EventKind::Any
            | EventKind::Other => None,
        }
    }

    /// Whether this kind of change should be pushed to clients as a reload.
    ///
    /// The watched file is expected to be edited in place, so only content
    /// writes qualify.
    #[must_use]
    pub fn triggers_reload(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// A change observed on the watched path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Kind of change.
    pub kind: ChangeKind,
    /// Path reported by the backend.
    pub path: PathBuf,
}

type Release = Box<dyn FnOnce() + Send>;

/// Handle to an active watch.
///
/// Uses RAII pattern - dropping the handle releases the watch automatically.
/// The release action runs at most once, whether through [`stop`](Self::stop)
/// or `Drop`.
pub struct WatchHandle {
    release: Option<Release>,
}

impl WatchHandle {
    /// Create a handle that runs `release` when the watch is given up.
    pub(crate) fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release the watch immediately (consumes the handle).
    pub fn stop(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.release.is_some())
            .finish()
    }
}
