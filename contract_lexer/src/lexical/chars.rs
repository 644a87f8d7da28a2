//! Character classes shared by the tokenizer and pattern validation

use unicode_ident::{is_xid_continue, is_xid_start};

/// First character of a WORD token or identifier segment
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || is_xid_start(ch)
}

/// Any later character of a WORD token or identifier segment
pub fn is_identifier_part(ch: char) -> bool {
    ch == '$' || is_xid_continue(ch)
}

/// Check that `text` is a single non-empty identifier
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_part),
        None => false,
    }
}

pub fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}
