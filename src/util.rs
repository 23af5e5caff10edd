// src/util.rs — Shared utility functions

/// Truncate a string for previews and logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Count whitespace-separated tokens in a document.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
