//! Single-file change notification for mdp live reload.
//!
//! This crate provides a [`FileWatcher`] trait for subscribing to changes of one
//! file on disk. Each subscription yields two lazy, unbounded sequences (change
//! events and transient watcher errors) and a [`WatchHandle`] that releases the
//! underlying OS watch exactly once.
//!
//! # Backends
//!
//! - [`FsWatcher`]: OS notifications via `notify` (inotify, `FSEvents`,
//!   `ReadDirectoryChangesW`)
//! - [`MockWatcher`]: in-memory event injection for tests (behind `mock` feature)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use mdp_watch::{FileWatcher, FsWatcher, Subscription};
//!
//! let Subscription { mut events, handle, .. } = FsWatcher::new().start(Path::new("notes.md"))?;
//! while let Some(event) = events.recv().await {
//!     if event.kind.triggers_reload() {
//!         println!("{} was written", event.path.display());
//!     }
//! }
//! handle.stop();
//! ```

mod error;
mod event;
mod fs;
#[cfg(feature = "mock")]
mod mock;
mod watcher;

pub use error::{WatchRuntimeError, WatchSetupError, WatchSetupErrorKind};
pub use event::{ChangeEvent, ChangeKind, WatchHandle};
pub use fs::FsWatcher;
#[cfg(feature = "mock")]
pub use mock::MockWatcher;
pub use watcher::{ChangeEventReceiver, FileWatcher, Subscription, WatchErrorReceiver};
