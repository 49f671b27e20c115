//! Growable byte buffer used to assemble inbound HTTP messages.
//!
//! A [`ByteBuffer`] starts in a distinguished empty state with no storage.
//! The first [`add`](ByteBuffer::add) allocates; later calls grow the storage
//! and keep every byte already written. The buffer never shrinks and is never
//! truncated in place.
//!
//! ```rust
//! use libshelf::network::buffer::ByteBuffer;
//!
//! let mut buffer = ByteBuffer::new();
//! assert!(buffer.is_empty());
//!
//! buffer.add(b"HTTP/1.1 200 OK\r\n");
//! buffer.add(b"content-length: 0\r\n\r\n");
//!
//! assert_eq!(buffer.find(b"\r\n\r\n"), Some(34));
//! assert_eq!(buffer.find_insensitive(b"Content-Length: "), Some(17));
//! ```

/// An owned, growable byte sequence with substring search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Option<Vec<u8>>,
}

impl ByteBuffer {
    /// Create a buffer in the empty state. Nothing is allocated.
    pub const fn new() -> Self {
        Self { data: None }
    }

    /// Append `data` to the end of the buffer.
    ///
    /// The first call allocates; later calls reserve at least `data.len()`
    /// additional bytes before copying.
    pub fn add(&mut self, data: &[u8]) {
        match self.data.as_mut() {
            Some(storage) => {
                storage.reserve(data.len());
                storage.extend_from_slice(data);
            }
            None => self.data = Some(data.to_vec()),
        }
    }

    /// Offset of the first exact occurrence of `pattern`, scanning left to
    /// right.
    pub fn find(&self, pattern: &[u8]) -> Option<usize> {
        self.find_from(pattern, 0)
    }

    /// Like [`find`](Self::find) but skips the first `from` bytes. The
    /// returned offset is still relative to the start of the buffer.
    pub fn find_from(&self, pattern: &[u8], from: usize) -> Option<usize> {
        let haystack = self.as_slice().get(from..)?;
        find_by(haystack, pattern, |a, b| a == b).map(|at| at + from)
    }

    /// Like [`find`](Self::find) but ASCII letters compare case-insensitively.
    pub fn find_insensitive(&self, pattern: &[u8]) -> Option<usize> {
        find_by(self.as_slice(), pattern, |a, b| a.eq_ignore_ascii_case(&b))
    }

    /// True iff no storage has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// The valid bytes.
    pub fn as_slice(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Release the storage and return to the empty state.
    ///
    /// A following [`add`](Self::add) behaves as a fresh first allocation.
    pub fn destroy(&mut self) {
        self.data = None;
    }

    /// Hand the storage over to the caller.
    pub fn into_vec(self) -> Vec<u8> {
        self.data.unwrap_or_default()
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Naive sliding-window search. Messages are small, so O(n * m) is fine.
fn find_by(haystack: &[u8], needle: &[u8], eq: impl Fn(u8, u8) -> bool) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    let last = haystack.len() - needle.len();
    (0..=last).find(|&start| {
        haystack[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(&a, &b)| eq(a, b))
    })
}
