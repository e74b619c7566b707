//! Transport handle for a connected client.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// The outbound half of a client connection.
///
/// Frames pushed here are written to the socket by the connection's writer
/// task. The socket may already be gone; senders must treat delivery as
/// best-effort.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    addr: SocketAddr,
    tx: mpsc::Sender<Arc<str>>,
}

impl ClientHandle {
    pub fn new(addr: SocketAddr, tx: mpsc::Sender<Arc<str>>) -> Self {
        Self { addr, tx }
    }

    /// Remote address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queue a text frame without waiting.
    pub fn try_send(&self, frame: Arc<str>) -> Result<(), TrySendError<Arc<str>>> {
        self.tx.try_send(frame)
    }

    /// Whether the writer side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// A handle whose writer is already gone.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self::new(SocketAddr::from(([127, 0, 0, 1], 0)), tx)
    }
}
