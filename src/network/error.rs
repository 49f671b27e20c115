//! Common error types for network operations

use std::io;

/// A common error type for network operations.
///
/// Every variant is terminal for the current request/response cycle; nothing
/// in the transport layer retries. I/O variants carry the [`io::ErrorKind`]
/// reported by the operating system so the caller can decide how to react.
#[derive(Debug, PartialEq, Eq, Clone, Copy, thiserror::Error)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    #[error("connection is not open")]
    NotOpen,
    /// The socket could not be created or configured.
    #[error("failed to create socket: {0}")]
    SocketCreate(io::ErrorKind),
    /// A connection attempt failed.
    #[error("failed to connect: {0}")]
    Connect(io::ErrorKind),
    /// An error occurred during a read operation.
    #[error("failed to read from socket: {0}")]
    Read(io::ErrorKind),
    /// An error occurred during a write operation.
    #[error("failed to write to socket: {0}")]
    Write(io::ErrorKind),
    /// The stream could not be shut down.
    #[error("failed to close socket: {0}")]
    Close(io::ErrorKind),
    /// A timeout occurred.
    #[error("operation timed out")]
    Timeout,
    /// The connection was closed before anything was received.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// An invalid address was provided.
    #[error("invalid address")]
    InvalidAddress,
    /// The response could not be framed or parsed.
    #[error("malformed response")]
    MalformedResponse,
    /// The peer closed the stream before the full message arrived.
    #[error("truncated response")]
    TruncatedResponse,
}

impl Error {
    /// Map an I/O error from a read, folding timeouts into [`Error::Timeout`].
    pub fn from_read(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
            kind => Error::Read(kind),
        }
    }

    /// Map an I/O error from a write, folding timeouts into [`Error::Timeout`].
    pub fn from_write(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Error::Timeout,
            kind => Error::Write(kind),
        }
    }
}
