//! Watch error types.

use std::fmt;
use std::path::{Path, PathBuf};

/// Why a subscription could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum WatchSetupErrorKind {
    /// Watched path does not exist.
    NotFound,
    /// Watched path exists but cannot be opened.
    PermissionDenied,
    /// Watched path is a directory or has no file name.
    NotAFile,
    /// The OS notification mechanism refused the watch.
    Backend,
}

/// A subscription could not be created for the requested path.
#[derive(Debug)]
pub struct WatchSetupError {
    /// Semantic error category.
    pub kind: WatchSetupErrorKind,
    /// Path that was requested.
    pub path: PathBuf,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl WatchSetupError {
    /// Create a new setup error for a path.
    #[must_use]
    pub fn new(kind: WatchSetupErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            source: None,
        }
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a setup error from an I/O error raised while probing the path.
    #[must_use]
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => WatchSetupErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => WatchSetupErrorKind::PermissionDenied,
            _ => WatchSetupErrorKind::Backend,
        };
        Self::new(kind, path).with_source(err)
    }

    /// Create a setup error from a `notify` backend failure.
    #[must_use]
    pub fn backend(err: notify::Error, path: &Path) -> Self {
        Self::new(WatchSetupErrorKind::Backend, path).with_source(err)
    }
}

impl fmt::Display for WatchSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "Cannot watch: Not found: <source> (path: notes.md)"
        let kind_str = match self.kind {
            WatchSetupErrorKind::NotFound => "Not found",
            WatchSetupErrorKind::PermissionDenied => "Permission denied",
            WatchSetupErrorKind::NotAFile => "Not a file",
            WatchSetupErrorKind::Backend => "Watcher error",
        };

        write!(f, "Cannot watch: {kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        write!(f, " (path: {})", self.path.display())
    }
}

impl std::error::Error for WatchSetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Transient error reported by the notification backend during an active watch.
#[derive(Debug, thiserror::Error)]
#[error("Watcher error: {0}")]
pub struct WatchRuntimeError(#[from] pub notify::Error);

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_io_not_found_maps_kind() {
        let err = WatchSetupError::io(
            std::io::Error::from(std::io::ErrorKind::NotFound),
            Path::new("notes.md"),
        );

        assert_eq!(err.kind, WatchSetupErrorKind::NotFound);
        assert_eq!(err.path, PathBuf::from("notes.md"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_permission_denied_maps_kind() {
        let err = WatchSetupError::io(
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            Path::new("notes.md"),
        );

        assert_eq!(err.kind, WatchSetupErrorKind::PermissionDenied);
    }

    #[test]
    fn test_display_without_source() {
        let err = WatchSetupError::new(WatchSetupErrorKind::NotAFile, "docs");

        assert_eq!(err.to_string(), "Cannot watch: Not a file (path: docs)");
    }

    #[test]
    fn test_display_with_source() {
        let err = WatchSetupError::backend(notify::Error::generic("boom"), Path::new("a.md"));

        let message = err.to_string();
        assert!(message.starts_with("Cannot watch: Watcher error: "));
        assert!(message.contains("boom"));
        assert!(message.ends_with("(path: a.md)"));
    }

    #[test]
    fn test_runtime_error_display() {
        let err = WatchRuntimeError::from(notify::Error::generic("queue overflow"));

        assert!(err.to_string().contains("queue overflow"));
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WatchSetupError>();
        assert_send_sync::<WatchRuntimeError>();
    }
}
