//! Transport layer for the library client.
//!
//! This module provides the traits a connection must implement, the growable
//! [`buffer::ByteBuffer`] used to assemble inbound messages, a blocking TCP
//! implementation in [`tcp`], and the HTTP/1.1 protocol pieces built on top of
//! them in [`application::http`].
//!
//! Everything here is synchronous: every call blocks the calling thread until
//! the socket has data, has accepted data, or reports closure.

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Growable byte buffer with substring search
pub mod buffer;

/// Blocking TCP connections
pub mod tcp;

/// Application layer protocols
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

// Core synchronous traits
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection.
    ///
    /// Returns `Ok(0)` once the peer has closed its side of the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection.
    ///
    /// Returns `Ok(0)` when the peer no longer accepts data.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection. The handle is consumed and cannot be reused.
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection.
///
/// All three halves report [`error::Error`] so callers can propagate failures
/// with `?` without converting between error types.
pub trait Connection:
    Read<Error = error::Error> + Write<Error = error::Error> + Close<Error = error::Error>
{
}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Open a connection to `remote`, given as `ip:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, error::Error>;
}

/// Outcome of pushing a complete message onto a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Every byte was accepted.
    Complete,
    /// The peer stopped accepting data after `sent` bytes.
    PeerClosed {
        /// Bytes written before the zero-length write.
        sent: usize,
    },
}

/// Write all of `message`, looping over partial writes.
///
/// A zero-length write ends the attempt early and is reported as
/// [`SendOutcome::PeerClosed`] rather than as an error.
pub fn send<W>(conn: &mut W, message: &[u8]) -> Result<SendOutcome, error::Error>
where
    W: Write<Error = error::Error> + ?Sized,
{
    let mut sent = 0;
    while sent < message.len() {
        let n = conn.write(&message[sent..])?;
        if n == 0 {
            tracing::warn!(sent, total = message.len(), "peer stopped accepting data");
            return Ok(SendOutcome::PeerClosed { sent });
        }
        sent += n;
    }
    conn.flush()?;
    tracing::trace!(bytes = sent, "message sent");
    Ok(SendOutcome::Complete)
}
