//! Live reload over WebSocket.
//!
//! Every connection to `/ws` runs its own session: it subscribes to the
//! watched markdown file and pushes a `reload` text frame for each write.
//! Sessions share nothing with each other.

mod session;
mod websocket;

pub(crate) use websocket::ws_handler;
