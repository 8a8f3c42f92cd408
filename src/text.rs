use crate::constants::{is_keyword, is_structural_char};
use crate::num::parse_number_token;

/// Append `s` with the wire escapes applied (`\n \r \t \" \\`). Other
/// control characters pass through raw; they are line-safe inside quotes.
pub(crate) fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
}

/// A key may be written bare when it cannot be confused with any other line
/// form: leading ASCII letter or underscore, then letters, digits,
/// underscores, or hyphens.
pub(crate) fn is_bare_key(key: &str) -> bool {
    let bytes = key.as_bytes();
    let Some(&first) = bytes.first() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != b'_' {
        return false;
    }
    bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-')
}

/// A string scalar must be quoted whenever emitting it bare would decode as
/// something else: literal tokens, number lookalikes, the list-item marker,
/// structural characters, the active delimiter, or boundary whitespace.
pub(crate) fn needs_quoting(s: &str, delimiter: char) -> bool {
    if s.is_empty() || is_keyword(s) || parse_number_token(s).is_some() {
        return true;
    }

    let mut chars = s.chars();
    let first = match chars.next() {
        Some(ch) => ch,
        None => return true,
    };
    if first == '-' || first.is_whitespace() {
        return true;
    }

    let mut last = first;
    for ch in std::iter::once(first).chain(chars) {
        if is_structural_char(ch)
            || ch == '"'
            || ch == '\\'
            || ch == delimiter
            || ch.is_control()
        {
            return true;
        }
        last = ch;
    }

    last.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_escape_into() {
        let mut out = String::new();
        escape_into(&mut out, "a\nb\t\"c\"\\d");
        assert_eq!(out, "a\\nb\\t\\\"c\\\"\\\\d");
    }

    #[rstest::rstest]
    fn test_is_bare_key() {
        assert!(is_bare_key("name"));
        assert!(is_bare_key("_private"));
        assert!(is_bare_key("snake_case"));
        assert!(is_bare_key("kebab-case"));
        assert!(is_bare_key("key9"));

        assert!(!is_bare_key(""));
        assert!(!is_bare_key("9lives"));
        assert!(!is_bare_key("-lead"));
        assert!(!is_bare_key("dotted.path"));
        assert!(!is_bare_key("has space"));
        assert!(!is_bare_key("colon:here"));
        assert!(!is_bare_key("émoji"));
    }

    #[rstest::rstest]
    fn test_needs_quoting_literal_lookalikes() {
        assert!(needs_quoting("", ','));
        assert!(needs_quoting("null", ','));
        assert!(needs_quoting("true", ','));
        assert!(needs_quoting("false", ','));
        assert!(needs_quoting("42", ','));
        assert!(needs_quoting("-1.5", ','));
        // Non-canonical number shapes stay bare.
        assert!(!needs_quoting("01", ','));
        assert!(!needs_quoting("1e5", ','));
    }

    #[rstest::rstest]
    fn test_needs_quoting_structure() {
        assert!(needs_quoting("a:b", ','));
        assert!(needs_quoting("a[b]", ','));
        assert!(needs_quoting("say \"hi\"", ','));
        assert!(needs_quoting("back\\slash", ','));
        assert!(needs_quoting("line\nbreak", ','));
        assert!(needs_quoting("-starts-like-item", ','));
        assert!(needs_quoting(" padded", ','));
        assert!(needs_quoting("padded ", ','));
    }

    #[rstest::rstest]
    fn test_needs_quoting_tracks_delimiter() {
        assert!(needs_quoting("a,b", ','));
        assert!(!needs_quoting("a,b", '|'));
        assert!(needs_quoting("a|b", '|'));
        assert!(!needs_quoting("hello world", ','));
        assert!(!needs_quoting("héllo", ','));
    }
}
