//! # Application Layer Network Protocols
//!
//! Protocols that run on top of a [`Connection`](crate::network::Connection).
//! The library client only needs HTTP/1.1, framed exclusively by
//! `Content-Length`.
//!
//! ## Usage Pattern
//!
//! 1. Open a connection using your transport layer
//! 2. Wrap it with the protocol client
//! 3. Run one request/response cycle, then close
//!
//! ```rust,no_run
//! use libshelf::network::application::http::{Client, Request};
//! use libshelf::network::tcp::{AddressFamily, SocketOptions, TcpConnection};
//!
//! # fn main() -> Result<(), libshelf::network::error::Error> {
//! let connection =
//!     TcpConnection::open("127.0.0.1", 8080, AddressFamily::Inet, SocketOptions::default())?;
//! let mut client = Client::new(connection);
//!
//! let request = Request::get("127.0.0.1", "/api/v1/tema/library/books").bearer(Some("tok"));
//! let exchange = client.request(&request)?;
//! println!("{}", exchange.response.status_code);
//! client.close()?;
//! # Ok(())
//! # }
//! ```

/// HTTP client implementation.
///
/// Request assembly, the `Content-Length` framed receive loop, and a parsed
/// view of responses.
pub mod http;
