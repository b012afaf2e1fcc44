//! Listener setup.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::error::ServerError;

/// Bind the first free port in `start..=max_port` on `host`.
///
/// The successful listener is returned as is, so no other process can take
/// the port between the check and the server start.
///
/// # Errors
///
/// Returns [`ServerError::NoAvailablePort`] if no port in the range binds.
pub async fn bind_available(
    host: &str,
    start: u16,
    max_port: u16,
) -> Result<(TcpListener, SocketAddr), ServerError> {
    for port in start..=max_port {
        match TcpListener::bind((host, port)).await {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                if port != start {
                    tracing::info!(requested = start, port, "Requested port busy, using next free port");
                }
                return Ok((listener, addr));
            }
            Err(e) => tracing::debug!(port, error = %e, "Port unavailable"),
        }
    }

    Err(ServerError::NoAvailablePort {
        host: host.to_owned(),
        start,
        end: max_port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_occupied_range_fails() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind_available("127.0.0.1", port, port).await.unwrap_err();

        match err {
            ServerError::NoAvailablePort { host, start, end } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(start, port);
                assert_eq!(end, port);
            }
            other => panic!("expected NoAvailablePort, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_skips_occupied_port() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let Some(max_port) = port.checked_add(20) else {
            return;
        };

        let (_listener, addr) = bind_available("127.0.0.1", port, max_port).await.unwrap();

        assert!(addr.port() > port);
        assert!(addr.port() <= max_port);
    }

    #[tokio::test]
    async fn test_empty_range_fails() {
        let err = bind_available("127.0.0.1", 9000, 8999).await.unwrap_err();

        assert!(matches!(err, ServerError::NoAvailablePort { .. }));
    }
}
