//! Entity identifier rules.
//!
//! App and service keys double as hostname labels (keep-alive routing, API
//! paths), so they follow RFC 1123 label syntax: `[0-9A-Za-z-]`, at most 63
//! bytes, no leading or trailing `-`.
//!
//! Case is preserved here. Lowercasing happens in validation, after this check.

/// Maximum length of a hostname label.
pub const MAX_ID_LENGTH: usize = 63;

const SEPARATOR: char = '-';

/// Return true if `id` is a legal app/service identifier.
pub fn is_entity_id(id: &str) -> bool {
    if id.is_empty() || id.len() > MAX_ID_LENGTH {
        return false;
    }
    if id.starts_with(SEPARATOR) || id.ends_with(SEPARATOR) {
        return false;
    }
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == SEPARATOR)
}
