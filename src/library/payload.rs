//! JSON bodies exchanged with the library server.
//!
//! Encoding and decoding go through `serde-json-core`. Outgoing bodies are
//! small (every field has been validated) and fit in a fixed
//! [`MAX_PAYLOAD_LEN`] buffer. Incoming objects are decoded in place, borrowing
//! their strings from the response body.

use serde::{Deserialize, Serialize};

/// Largest request body the client builds.
pub const MAX_PAYLOAD_LEN: usize = 1024;

/// Name of the session cookie the server hands out.
pub const SESSION_COOKIE: &str = "connect.sid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// The value did not fit in [`MAX_PAYLOAD_LEN`] bytes.
    #[error("request body too large")]
    Encode,
    /// The server sent JSON of an unexpected shape.
    #[error("unexpected response body")]
    Decode,
}

/// Body of the register and login requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of the add-book request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewBook<'a> {
    pub title: &'a str,
    pub author: &'a str,
    pub genre: &'a str,
    pub page_count: u32,
    pub publisher: &'a str,
}

/// Reply to the library access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TokenReply<'a> {
    #[serde(borrow)]
    pub token: &'a str,
}

/// Body of every refusal the server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Refusal<'a> {
    #[serde(borrow)]
    pub error: &'a str,
}

/// One entry of the book listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BookSummary<'a> {
    pub id: u64,
    #[serde(borrow)]
    pub title: &'a str,
}

/// Full record of a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Book<'a> {
    #[serde(borrow)]
    pub title: &'a str,
    #[serde(borrow)]
    pub author: &'a str,
    #[serde(borrow)]
    pub genre: &'a str,
    pub page_count: u32,
    #[serde(borrow)]
    pub publisher: &'a str,
}

/// A book whose `page_count` was stored as a string.
#[derive(Deserialize)]
struct QuotedBook<'a> {
    #[serde(borrow)]
    title: &'a str,
    #[serde(borrow)]
    author: &'a str,
    #[serde(borrow)]
    genre: &'a str,
    #[serde(borrow)]
    page_count: &'a str,
    #[serde(borrow)]
    publisher: &'a str,
}

/// Serialize `value` into a request body.
pub fn encode<T: Serialize>(value: &T) -> Result<heapless::Vec<u8, MAX_PAYLOAD_LEN>, PayloadError> {
    serde_json_core::to_vec(value).map_err(|_| PayloadError::Encode)
}

/// Decode one JSON object from `text`, skipping anything before it.
pub fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, PayloadError> {
    let json = extract_json(text).ok_or(PayloadError::Decode)?;
    serde_json_core::from_str(json)
        .map(|(value, _)| value)
        .map_err(|_| PayloadError::Decode)
}

/// Decode a single book record.
///
/// Clients that send `page_count` as a quoted string get it stored that way,
/// so both `412` and `"412"` are accepted.
pub fn decode_book(text: &str) -> Result<Book<'_>, PayloadError> {
    if let Ok(book) = decode::<Book>(text) {
        return Ok(book);
    }
    let quoted: QuotedBook = decode(text)?;
    Ok(Book {
        title: quoted.title,
        author: quoted.author,
        genre: quoted.genre,
        page_count: quoted.page_count.parse().map_err(|_| PayloadError::Decode)?,
        publisher: quoted.publisher,
    })
}

/// Decode a JSON array of objects, one element at a time.
pub fn decode_list<'a, T: Deserialize<'a>>(text: &'a str) -> Result<Vec<T>, PayloadError> {
    let start = text.find('[').ok_or(PayloadError::Decode)?;
    split_objects(&text[start..])?
        .into_iter()
        .map(|object| {
            serde_json_core::from_str(object)
                .map(|(value, _)| value)
                .map_err(|_| PayloadError::Decode)
        })
        .collect()
}

/// Slice of `text` starting at the first JSON object.
pub fn extract_json(text: &str) -> Option<&str> {
    text.find("{\"").map(|start| &text[start..])
}

/// The `connect.sid=...` pair, up to the next `;` or line end.
pub fn extract_session_cookie(text: &str) -> Option<&str> {
    let start = text.find(SESSION_COOKIE)?;
    let rest = &text[start..];
    let end = rest.find([';', '\r', '\n']).unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Top-level objects of a JSON array.
///
/// Braces inside strings are ignored; a missing closing bracket or an
/// unbalanced object is a decode error.
fn split_objects(array: &str) -> Result<Vec<&str>, PayloadError> {
    let bytes = array.as_bytes();
    if bytes.first() != Some(&b'[') {
        return Err(PayloadError::Decode);
    }

    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in bytes.iter().enumerate().skip(1) {
        if escape_next {
            escape_next = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            b'}' if !in_string => {
                depth = depth.checked_sub(1).ok_or(PayloadError::Decode)?;
                if depth == 0 {
                    objects.push(&array[start..=i]);
                }
            }
            b']' if !in_string && depth == 0 => return Ok(objects),
            _ => {}
        }
    }

    Err(PayloadError::Decode)
}
