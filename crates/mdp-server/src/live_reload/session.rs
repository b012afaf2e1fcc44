//! Per-connection live reload session.

use std::path::Path;

use mdp_watch::{FileWatcher, Subscription};

/// Text frame pushed to the client when the watched file is written.
pub(crate) const RELOAD_MESSAGE: &str = "reload";

/// Frame received from the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Inbound {
    /// Close frame.
    Close,
    /// Any other frame (text, binary, ping, pong).
    Frame,
}

/// Bidirectional message channel a session pushes reload frames into.
///
/// Implemented by axum's `WebSocket`; tests use an in-memory channel.
pub(crate) trait PushChannel: Send {
    /// Send one text frame.
    fn push_text(
        &mut self,
        text: &'static str,
    ) -> impl Future<Output = Result<(), axum::Error>> + Send;

    /// Wait for the next client frame. `None` means the stream ended.
    fn next_inbound(&mut self) -> impl Future<Output = Option<Result<Inbound, axum::Error>>> + Send;

    /// Close the channel. Errors are ignored.
    fn finish(&mut self) -> impl Future<Output = ()> + Send;
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    /// The watch target could not be subscribed.
    WatchSetupFailed,
    /// The watcher stopped delivering events.
    WatcherClosed,
    /// A reload frame could not be sent.
    SendFailed,
    /// The client closed the connection or the stream ended.
    ClientClosed,
    /// Reading from the client failed.
    ReceiveFailed,
}

/// Run one live reload session until the client or the watcher goes away.
///
/// Starts a subscription on `target`, forwards every write as a
/// [`RELOAD_MESSAGE`] frame in arrival order, and releases the subscription
/// exactly once before closing the channel.
pub(crate) async fn run_session<C: PushChannel>(
    channel: &mut C,
    watcher: &dyn FileWatcher,
    target: &Path,
) -> SessionEnd {
    let Subscription {
        mut events,
        mut errors,
        handle,
    } = match watcher.start(target) {
        Ok(subscription) => subscription,
        Err(e) => {
            tracing::warn!(error = %e, "Live reload unavailable for this connection");
            channel.finish().await;
            return SessionEnd::WatchSetupFailed;
        }
    };

    tracing::debug!(path = %target.display(), "Live reload session started");

    let end = loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::warn!(path = %target.display(), "File watcher stopped");
                    break SessionEnd::WatcherClosed;
                };
                if !event.kind.triggers_reload() {
                    tracing::debug!(kind = ?event.kind, "Ignoring change");
                    continue;
                }
                if let Err(e) = channel.push_text(RELOAD_MESSAGE).await {
                    tracing::warn!(error = %e, "Failed to send reload message");
                    break SessionEnd::SendFailed;
                }
                tracing::debug!(path = %event.path.display(), "Sent reload");
            }
            Some(error) = errors.recv() => {
                tracing::warn!(error = %error, "File watcher error");
            }
            inbound = channel.next_inbound() => match inbound {
                Some(Ok(Inbound::Frame)) => {}
                Some(Ok(Inbound::Close)) | None => break SessionEnd::ClientClosed,
                Some(Err(e)) => {
                    tracing::debug!(error = %e, "WebSocket receive failed");
                    break SessionEnd::ReceiveFailed;
                }
            }
        }
    };

    handle.stop();
    channel.finish().await;
    end
}
