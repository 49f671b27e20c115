//! # libshelf - library-management API client
//!
//! A command-line client for a small library-management REST API (register,
//! login, browse, add and delete books, logout). It speaks HTTP/1.1 directly
//! over blocking TCP sockets instead of going through an HTTP stack.
//!
//! ## Layers
//!
//! ### Transport ([`network`])
//! - **ByteBuffer**: growable byte storage with exact and case-insensitive
//!   substring search
//! - **Connection**: one blocking TCP stream per request/response cycle
//! - **Request assembly**: GET, POST and DELETE with bearer token and cookies
//! - **Response reading**: `Content-Length` framing across arbitrary chunk
//!   boundaries
//!
//! ### Application ([`library`])
//! - Session state, input validation and JSON payloads
//! - A dispatcher with one method per command
//! - An interactive shell driving the dispatcher
//!
//! ## Usage
//!
//! ```rust,no_run
//! use libshelf::network::application::http::request::compute_get_request;
//! use libshelf::network::application::http::reader::receive_from_server;
//! use libshelf::network::tcp::{AddressFamily, SocketOptions, TcpConnection};
//! use libshelf::network::{Close, send};
//!
//! # fn main() -> Result<(), libshelf::network::error::Error> {
//! let mut conn =
//!     TcpConnection::open("34.254.242.81", 8080, AddressFamily::Inet, SocketOptions::default())?;
//! let request = compute_get_request(
//!     "34.254.242.81",
//!     "/api/v1/tema/library/books",
//!     None,
//!     &[],
//!     Some("token"),
//! );
//! send(&mut conn, &request)?;
//! let response = receive_from_server(&mut conn)?;
//! conn.close()?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```
//!
//! Chunked transfer-encoding, redirects, connection reuse and TLS are not
//! supported.

#![warn(missing_debug_implementations)]

/// Transport layer: connection traits, buffers, TCP and HTTP/1.1.
pub mod network;

/// Library API client: session, payloads, dispatcher and shell.
pub mod library;
