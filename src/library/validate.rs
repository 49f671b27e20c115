//! Input checks applied before a request is built.

/// Non-empty, and only ASCII letters, digits, `_`, `.` or `-`.
pub fn is_valid_field(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

/// Non-empty, and only ASCII digits.
pub fn is_valid_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
