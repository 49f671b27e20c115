//! The `Content-Length` framed receive loop.
//!
//! Reading happens in two phases:
//!
//! 1. **Headers.** Chunks of at most [`SCRATCH_SIZE`] bytes are appended to a
//!    [`ByteBuffer`] until the header terminator `\r\n\r\n` shows up. The
//!    `Content-Length: ` header is then located case-insensitively and its
//!    decimal value parsed. While the header is missing the loop keeps reading
//!    and rescanning, bounded by [`FramingLimits`].
//! 2. **Body.** Chunks are appended until the buffer holds
//!    `header_end + content_length` bytes.
//!
//! A zero-length read in either phase ends the loop with whatever arrived;
//! the returned [`RawResponse`] records where that happened in its
//! [`Framing`]. Once reading stops a single zero byte is appended so the
//! message can be handled as bounded text.

use crate::network::Read;
use crate::network::buffer::ByteBuffer;
use crate::network::error::Error;
use std::borrow::Cow;

/// Size of the scratch chunk each socket read fills.
pub const SCRATCH_SIZE: usize = 4096;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &[u8] = b"Content-Length: ";

/// Bounds on how long the reader waits for a usable `Content-Length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingLimits {
    /// Chunks read after the header terminator while `Content-Length` is
    /// still missing.
    pub max_header_rescans: usize,
    /// Bytes accepted before the header terminator is seen.
    pub max_header_bytes: usize,
    /// Largest declared body length accepted.
    pub max_content_length: usize,
}

impl Default for FramingLimits {
    fn default() -> Self {
        Self {
            max_header_rescans: 16,
            max_header_bytes: 64 * 1024,
            max_content_length: 16 * 1024 * 1024,
        }
    }
}

/// How the receive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Headers and the full declared body arrived.
    Complete,
    /// The peer closed before the headers and `Content-Length` were seen.
    ClosedInHeaders,
    /// The peer closed before the declared body length arrived.
    ClosedInBody,
}

/// Bytes of one response as read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// Message bytes followed by one zero byte.
    buffer: ByteBuffer,
    header_end: Option<usize>,
    content_length: Option<usize>,
    framing: Framing,
}

impl RawResponse {
    fn finish(
        mut buffer: ByteBuffer,
        header_end: Option<usize>,
        content_length: Option<usize>,
        framing: Framing,
    ) -> Self {
        buffer.add(&[0]);
        Self {
            buffer,
            header_end,
            content_length,
            framing,
        }
    }

    /// The message, without the terminating zero byte.
    pub fn bytes(&self) -> &[u8] {
        let all = self.buffer.as_slice();
        &all[..all.len() - 1]
    }

    /// The message including the terminating zero byte.
    pub fn bytes_with_nul(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// The message as text. Invalid UTF-8 is replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.bytes())
    }

    /// Offset right after the header terminator, if one was seen.
    pub fn header_end(&self) -> Option<usize> {
        self.header_end
    }

    /// Declared body length, if the header was found.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn is_complete(&self) -> bool {
        self.framing == Framing::Complete
    }

    /// Hand the message bytes over to the caller, dropping the terminator.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = self.buffer.into_vec();
        bytes.pop();
        bytes
    }
}

/// Reads complete responses off a connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseReader {
    limits: FramingLimits,
}

impl ResponseReader {
    pub fn new(limits: FramingLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &FramingLimits {
        &self.limits
    }

    /// Read from `conn` until the response is complete or the peer closes.
    ///
    /// # Errors
    ///
    /// - Any error the connection reports while reading.
    /// - [`Error::MalformedResponse`] when the headers grow past the limit,
    ///   `Content-Length` never shows up within the rescan budget, or the
    ///   declared length is out of range.
    pub fn read_from<R>(&self, conn: &mut R) -> Result<RawResponse, Error>
    where
        R: Read<Error = Error> + ?Sized,
    {
        let mut scratch = [0u8; SCRATCH_SIZE];
        let mut buffer = ByteBuffer::new();
        let mut header_end = None;
        let mut rescans = 0;

        // Phase 1: headers.
        let (header_end, content_length) = loop {
            let n = conn.read(&mut scratch)?;
            if n == 0 {
                tracing::warn!(
                    received = buffer.len(),
                    "peer closed before the response headers were complete"
                );
                return Ok(RawResponse::finish(
                    buffer,
                    header_end,
                    None,
                    Framing::ClosedInHeaders,
                ));
            }
            let scanned = buffer.len();
            buffer.add(&scratch[..n]);

            let end = match header_end {
                Some(end) => end,
                None => {
                    // The terminator may straddle the previous chunk boundary.
                    let from = scanned.saturating_sub(HEADER_TERMINATOR.len() - 1);
                    let Some(terminator) = buffer.find_from(HEADER_TERMINATOR, from) else {
                        if buffer.len() > self.limits.max_header_bytes {
                            tracing::warn!(received = buffer.len(), "response headers too large");
                            return Err(Error::MalformedResponse);
                        }
                        continue;
                    };
                    let end = terminator + HEADER_TERMINATOR.len();
                    header_end = Some(end);
                    end
                }
            };

            match buffer.find_insensitive(CONTENT_LENGTH) {
                Some(start) => {
                    let value = &buffer.as_slice()[start + CONTENT_LENGTH.len()..];
                    let length = parse_content_length(value)?;
                    if length > self.limits.max_content_length {
                        tracing::warn!(length, "declared body length out of range");
                        return Err(Error::MalformedResponse);
                    }
                    break (end, length);
                }
                None => {
                    rescans += 1;
                    if rescans > self.limits.max_header_rescans {
                        tracing::warn!(rescans, "response carries no Content-Length header");
                        return Err(Error::MalformedResponse);
                    }
                }
            }
        };

        let total = header_end
            .checked_add(content_length)
            .ok_or(Error::MalformedResponse)?;
        tracing::debug!(header_end, content_length, "response headers framed");

        // Phase 2: body.
        let mut framing = Framing::Complete;
        while buffer.len() < total {
            let n = conn.read(&mut scratch)?;
            if n == 0 {
                tracing::warn!(
                    received = buffer.len(),
                    expected = total,
                    "peer closed before the response body was complete"
                );
                framing = Framing::ClosedInBody;
                break;
            }
            buffer.add(&scratch[..n]);
        }

        Ok(RawResponse::finish(
            buffer,
            Some(header_end),
            Some(content_length),
            framing,
        ))
    }
}

/// Receive one response with the default limits.
pub fn receive_from_server<R>(conn: &mut R) -> Result<RawResponse, Error>
where
    R: Read<Error = Error> + ?Sized,
{
    ResponseReader::default().read_from(conn)
}

/// Decimal prefix of `bytes`, after any leading blanks.
///
/// Parsing stops at the first non-digit; no digits at all reads as zero.
fn parse_content_length(bytes: &[u8]) -> Result<usize, Error> {
    bytes
        .iter()
        .skip_while(|b| matches!(b, b' ' | b'\t'))
        .take_while(|b| b.is_ascii_digit())
        .try_fold(0usize, |acc, &digit| {
            acc.checked_mul(10)
                .and_then(|acc| acc.checked_add(usize::from(digit - b'0')))
        })
        .ok_or(Error::MalformedResponse)
}
