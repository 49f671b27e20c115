//! HTTP/1.1 protocol implementation for the library client.
//!
//! # Features
//!
//! - GET, POST and DELETE request assembly with bearer token and cookie headers
//! - A receive loop that frames responses by `Content-Length` across arbitrary
//!   chunk boundaries
//! - A parsed view of the status line, headers and body
//! - One connection per request/response cycle; nothing is pooled
//!
//! Chunked transfer-encoding, header folding, redirects and TLS are not
//! supported.

/// HTTP client driving one cycle over one connection.
pub mod client;

/// The `Content-Length` framed receive loop.
pub mod reader;

/// Request assembly.
pub mod request;

/// Parsed response view.
pub mod response;

pub use client::{Client, Exchange};
pub use reader::{Framing, FramingLimits, RawResponse, ResponseReader};
pub use request::{Body, Method, Request};
pub use response::{Header, Response};
