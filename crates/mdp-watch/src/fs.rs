//! Filesystem watcher implementation.
//!
//! Provides [`FsWatcher`], which subscribes to one file through the platform's
//! recommended `notify` backend.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{WatchRuntimeError, WatchSetupError, WatchSetupErrorKind};
use crate::event::{ChangeEvent, ChangeKind, WatchHandle};
use crate::watcher::{FileWatcher, Subscription};

/// Filesystem watcher backed by `notify`.
///
/// The watch is registered on the file's parent directory (non-recursively)
/// and filtered down to the file's name. This keeps the subscription attached
/// to the path rather than the inode, so a file that is deleted and recreated
/// by an editor keeps producing events.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use mdp_watch::{FileWatcher, FsWatcher};
///
/// let subscription = FsWatcher::new().start(Path::new("content.md"))?;
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWatcher;

impl FsWatcher {
    /// Create a new filesystem watcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check that `path` is an existing, readable file and return its name.
    fn probe(path: &Path) -> Result<OsString, WatchSetupError> {
        let metadata = fs::metadata(path).map_err(|e| WatchSetupError::io(e, path))?;
        if !metadata.is_file() {
            return Err(WatchSetupError::new(WatchSetupErrorKind::NotAFile, path));
        }

        // Opening is the only portable way to detect missing read permission
        fs::File::open(path).map_err(|e| WatchSetupError::io(e, path))?;

        path.file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| WatchSetupError::new(WatchSetupErrorKind::NotAFile, path))
    }
}

impl FileWatcher for FsWatcher {
    fn start(&self, path: &Path) -> Result<Subscription, WatchSetupError> {
        let file_name = Self::probe(path)?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        // Senders live in the callback, so the sequences end once the
        // backend drops it after the watcher is released.
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                match res {
                    Ok(event) => {
                        let Some(kind) = ChangeKind::from_notify(&event.kind) else {
                            return;
                        };

                        for path in event.paths {
                            if path.file_name() != Some(file_name.as_os_str()) {
                                continue;
                            }
                            let _ = event_tx.send(ChangeEvent { kind, path });
                        }
                    }
                    Err(err) => {
                        let _ = error_tx.send(WatchRuntimeError::from(err));
                    }
                }
            })
            .map_err(|e| WatchSetupError::backend(e, path))?;

        watcher
            .watch(parent, RecursiveMode::NonRecursive)
            .map_err(|e| WatchSetupError::backend(e, path))?;

        tracing::debug!(path = %path.display(), "Watch registered");

        let watched = path.to_path_buf();
        let handle = WatchHandle::new(move || {
            drop(watcher);
            tracing::debug!(path = %watched.display(), "Watch released");
        });

        Ok(Subscription {
            events: event_rx,
            errors: error_rx,
            handle,
        })
    }
}
