use super::reader::{Framing, FramingLimits, RawResponse, ResponseReader};
use super::request::Request;
use super::response::Response;
use crate::network::error::Error;
use crate::network::{Close, Connection, SendOutcome, send};

/// Result of one request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// How the request left the socket.
    pub sent: SendOutcome,
    /// Bytes as received, including their framing status.
    pub raw: RawResponse,
    pub response: Response,
}

impl Exchange {
    /// The whole received message as text.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        self.raw.text()
    }
}

/// HTTP client bound to a single connection.
///
/// A client serves one request/response cycle and is then closed; connections
/// are never reused.
#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
    reader: ResponseReader,
}

impl<C: Connection> Client<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            reader: ResponseReader::default(),
        }
    }

    pub fn with_limits(mut self, limits: FramingLimits) -> Self {
        self.reader = ResponseReader::new(limits);
        self
    }

    /// Push raw request bytes onto the connection.
    pub fn send(&mut self, message: &[u8]) -> Result<SendOutcome, Error> {
        send(&mut self.connection, message)
    }

    /// Read one complete response.
    pub fn receive(&mut self) -> Result<RawResponse, Error> {
        self.reader.read_from(&mut self.connection)
    }

    /// Send `request` and read back its response.
    ///
    /// A response cut short inside the body is returned as-is; check
    /// [`RawResponse::is_complete`] when that matters.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the peer closed without sending a byte.
    /// - [`Error::TruncatedResponse`] if it closed inside the headers.
    /// - Any transport or framing error from the connection or the reader.
    pub fn request(&mut self, request: &Request) -> Result<Exchange, Error> {
        tracing::debug!(method = request.method.as_str(), path = request.path, "sending request");
        let sent = self.send(&request.to_bytes())?;

        let raw = self.receive()?;
        if raw.framing() == Framing::ClosedInHeaders && raw.bytes().is_empty() {
            return Err(Error::ConnectionClosed);
        }
        let response = Response::parse(&raw)?;
        tracing::debug!(status = response.status_code, "response received");

        Ok(Exchange {
            sent,
            raw,
            response,
        })
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// Release the connection.
    pub fn close(self) -> Result<(), Error> {
        self.connection.close()
    }
}
