//! Mock watcher implementation for testing.
//!
//! Provides [`MockWatcher`] for exercising live reload without filesystem access.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::{WatchRuntimeError, WatchSetupError, WatchSetupErrorKind};
use crate::event::{ChangeEvent, ChangeKind, WatchHandle};
use crate::watcher::{FileWatcher, Subscription};

/// One live mock subscription.
struct Subscriber {
    id: u64,
    path: PathBuf,
    events: mpsc::UnboundedSender<ChangeEvent>,
    errors: mpsc::UnboundedSender<WatchRuntimeError>,
}

#[derive(Default)]
struct MockState {
    missing: HashSet<PathBuf>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    acquired: usize,
    released: usize,
}

/// Mock watcher for testing.
///
/// Every subscription is kept in memory; events injected with
/// [`emit`](Self::emit) are delivered to all live subscriptions in order.
/// Acquisitions and releases are counted so tests can check that each
/// watch is given back exactly once.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use mdp_watch::{ChangeKind, FileWatcher, MockWatcher};
///
/// let watcher = MockWatcher::new();
/// let mut subscription = watcher.start(Path::new("notes.md")).unwrap();
/// watcher.emit(ChangeKind::Write);
/// ```
#[derive(Clone, Default)]
pub struct MockWatcher {
    state: Arc<Mutex<MockState>>,
}

impl MockWatcher {
    /// Create a mock watcher where every path can be watched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subscriptions to `path` fail with `NotFound`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_missing(self, path: impl Into<PathBuf>) -> Self {
        self.state.lock().unwrap().missing.insert(path.into());
        self
    }

    /// Deliver a change of `kind` to every live subscription.
    ///
    /// Returns the number of subscriptions the event was delivered to.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn emit(&self, kind: ChangeKind) -> usize {
        let state = self.state.lock().unwrap();
        state
            .subscribers
            .iter()
            .filter(|sub| {
                sub.events
                    .send(ChangeEvent {
                        kind,
                        path: sub.path.clone(),
                    })
                    .is_ok()
            })
            .count()
    }

    /// Deliver a runtime error to every live subscription.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn emit_error(&self, message: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .subscribers
            .iter()
            .filter(|sub| {
                sub.errors
                    .send(WatchRuntimeError::from(notify::Error::generic(message)))
                    .is_ok()
            })
            .count()
    }

    /// Simulate the backend shutting down: all event sequences end.
    ///
    /// Subscriptions stay registered until their handles are released.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn disconnect_all(&self) {
        let mut state = self.state.lock().unwrap();
        for sub in &mut state.subscribers {
            let (closed, _) = mpsc::unbounded_channel();
            sub.events = closed;
        }
    }

    /// Number of subscriptions that have not been released.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn active(&self) -> usize {
        self.state.lock().unwrap().subscribers.len()
    }

    /// Total number of subscriptions handed out.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.state.lock().unwrap().acquired
    }

    /// Total number of subscriptions released.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn released(&self) -> usize {
        self.state.lock().unwrap().released
    }
}

impl FileWatcher for MockWatcher {
    fn start(&self, path: &Path) -> Result<Subscription, WatchSetupError> {
        let mut state = self.state.lock().unwrap();
        if state.missing.contains(path) {
            return Err(WatchSetupError::new(WatchSetupErrorKind::NotFound, path));
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();

        let id = state.next_id;
        state.next_id += 1;
        state.acquired += 1;
        state.subscribers.push(Subscriber {
            id,
            path: path.to_path_buf(),
            events: event_tx,
            errors: error_tx,
        });

        let shared = Arc::clone(&self.state);
        let handle = WatchHandle::new(move || {
            let mut state = shared.lock().unwrap();
            state.subscribers.retain(|sub| sub.id != id);
            state.released += 1;
        });

        Ok(Subscription {
            events: event_rx,
            errors: error_rx,
            handle,
        })
    }
}
