//! Blocking TCP connections.
//!
//! [`TcpConnection`] wraps one connected [`TcpStream`] for the lifetime of a
//! single request/response cycle. It is opened against a literal IP address;
//! no name resolution takes place.

use super::error::Error;
use super::{Close, Connect, Connection, Read, Write};
use std::io::{Read as _, Write as _};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// Address family the literal host must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    /// Dotted-quad IPv4 addresses.
    #[default]
    Inet,
    /// IPv6 addresses.
    Inet6,
}

impl AddressFamily {
    fn matches(self, addr: &IpAddr) -> bool {
        matches!(
            (self, addr),
            (AddressFamily::Inet, IpAddr::V4(_)) | (AddressFamily::Inet6, IpAddr::V6(_))
        )
    }
}

/// Socket options applied when a connection is opened.
///
/// `None` leaves the corresponding operation fully blocking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SocketOptions {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

/// One live TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl TcpConnection {
    /// Connect to `host:port`, where `host` is a literal address of `family`.
    pub fn open(
        host: &str,
        port: u16,
        family: AddressFamily,
        options: SocketOptions,
    ) -> Result<Self, Error> {
        let ip: IpAddr = host.parse().map_err(|_| Error::InvalidAddress)?;
        if !family.matches(&ip) {
            return Err(Error::InvalidAddress);
        }
        let peer = SocketAddr::new(ip, port);

        let stream = match options.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&peer, timeout),
            None => TcpStream::connect(peer),
        }
        .map_err(|e| {
            tracing::error!(%peer, error = %e, "connect failed");
            Error::Connect(e.kind())
        })?;

        stream
            .set_read_timeout(options.read_timeout)
            .and_then(|_| stream.set_write_timeout(options.write_timeout))
            .map_err(|e| Error::SocketCreate(e.kind()))?;

        tracing::debug!(%peer, "connection opened");
        Ok(Self { stream, peer })
    }

    /// Address of the remote end.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|e| Error::from_read(&e))
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|e| Error::from_write(&e))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|e| Error::from_write(&e))
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        shutdown_result(self.stream.shutdown(Shutdown::Both))?;
        tracing::debug!(peer = %self.peer, "connection closed");
        Ok(())
    }
}

impl Connection for TcpConnection {}

/// Opens [`TcpConnection`]s from `ip:port` strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector {
    pub family: AddressFamily,
    pub options: SocketOptions,
}

impl TcpConnector {
    pub fn new(family: AddressFamily, options: SocketOptions) -> Self {
        Self { family, options }
    }
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Error> {
        let (host, port) = split_remote(remote)?;
        TcpConnection::open(host, port, self.family, self.options)
    }
}

/// The peer may already have torn the stream down; that is not a failure.
fn shutdown_result(result: std::io::Result<()>) -> Result<(), Error> {
    match result {
        Err(e) if e.kind() != std::io::ErrorKind::NotConnected => Err(Error::Close(e.kind())),
        _ => Ok(()),
    }
}

/// Split `ip:port` (or `[v6]:port`) into its parts.
fn split_remote(remote: &str) -> Result<(&str, u16), Error> {
    let (host, port) = remote.rsplit_once(':').ok_or(Error::InvalidAddress)?;
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    let port = port.parse().map_err(|_| Error::InvalidAddress)?;
    Ok((host, port))
}
