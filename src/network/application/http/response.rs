//! Parsed view of a received response.

use super::reader::{Framing, RawResponse};
use crate::network::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub status_code: u16,
    pub reason: String,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
}

impl Response {
    /// Parse the status line, headers and body out of `raw`.
    ///
    /// The body is cut at the declared `Content-Length`; a short body is kept
    /// as it arrived.
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedResponse`] if the peer closed before the headers
    ///   ended.
    /// - [`Error::MalformedResponse`] if the status line or a header line
    ///   cannot be parsed.
    pub fn parse(raw: &RawResponse) -> Result<Self, Error> {
        let bytes = raw.bytes();
        let header_end = match raw.header_end() {
            Some(end) => end,
            None if raw.framing() == Framing::ClosedInHeaders => {
                return Err(Error::TruncatedResponse);
            }
            None => return Err(Error::MalformedResponse),
        };

        let head =
            core::str::from_utf8(&bytes[..header_end]).map_err(|_| Error::MalformedResponse)?;
        let mut lines = head.split("\r\n").filter(|line| !line.is_empty());

        let status_line = lines.next().ok_or(Error::MalformedResponse)?;
        let mut parts = status_line.splitn(3, ' ');
        let version = parts.next().ok_or(Error::MalformedResponse)?;
        if !version.starts_with("HTTP/") {
            return Err(Error::MalformedResponse);
        }
        let status_code = parts
            .next()
            .and_then(|code| code.parse::<u16>().ok())
            .ok_or(Error::MalformedResponse)?;
        let reason = parts.next().unwrap_or("");

        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(':').ok_or(Error::MalformedResponse)?;
                Ok(Header {
                    name: name.trim().to_string(),
                    value: value.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let body_end = match raw.content_length() {
            Some(len) => bytes.len().min(header_end + len),
            None => bytes.len(),
        };

        Ok(Self {
            version: version.to_string(),
            status_code,
            reason: reason.to_string(),
            headers,
            body: bytes[header_end..body_end].to_vec(),
        })
    }

    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers(name).next()
    }

    /// Every header named `name`, in order of arrival.
    pub fn headers<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.headers
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
