//! CSS serialization helpers
//!
//! Identifier and string escaping as defined by CSSOM "serialize an
//! identifier" / "serialize a string".

use std::fmt::Write;

/// Identifier escaping failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EscapeError {
    /// U+0000 cannot appear in an identifier
    #[error("invalid character: the input contains U+0000 at offset {0}")]
    InvalidCharacter(usize),
}

/// Escape a string so it can be used as a CSS identifier
/// (tag, id or class name).
///
/// ```
/// use fos_css::escape_identifier;
///
/// assert_eq!(escape_identifier("1a").unwrap(), "\\31 a");
/// assert_eq!(escape_identifier("a.b").unwrap(), "a\\.b");
/// assert!(escape_identifier("a\0b").is_err());
/// ```
pub fn escape_identifier(value: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(value.len());
    let first = value.chars().next();
    let single = value.chars().nth(1).is_none();

    for (index, (offset, c)) in value.char_indices().enumerate() {
        match c {
            '\0' => return Err(EscapeError::InvalidCharacter(offset)),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_code_point(&mut out, c),
            '0'..='9' if index == 0 => push_code_point(&mut out, c),
            '0'..='9' if index == 1 && first == Some('-') => push_code_point(&mut out, c),
            '-' if index == 0 && single => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    Ok(out)
}

/// Escape the contents of a double-quoted CSS string (quotes not included).
///
/// NUL becomes U+FFFD, so this never fails.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\0' => out.push('\u{fffd}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_code_point(&mut out, c),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn push_code_point(out: &mut String, c: char) {
    // writing into a String cannot fail
    let _ = write!(out, "\\{:x} ", c as u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_digit() {
        assert_eq!(escape_identifier("1a").unwrap(), "\\31 a");
        assert_eq!(escape_identifier("9").unwrap(), "\\39 ");
    }

    #[test]
    fn test_hyphen_rules() {
        assert_eq!(escape_identifier("-").unwrap(), "\\-");
        assert_eq!(escape_identifier("-1").unwrap(), "-\\31 ");
        assert_eq!(escape_identifier("--x").unwrap(), "--x");
        assert_eq!(escape_identifier("-a").unwrap(), "-a");
    }

    #[test]
    fn test_control_and_punctuation() {
        assert_eq!(escape_identifier("a\u{1}b").unwrap(), "a\\1 b");
        assert_eq!(escape_identifier("a\u{7f}").unwrap(), "a\\7f ");
        assert_eq!(escape_identifier("a b:c").unwrap(), "a\\ b\\:c");
        assert_eq!(escape_identifier("日本").unwrap(), "日本");
        assert_eq!(escape_identifier("").unwrap(), "");
    }

    #[test]
    fn test_nul_is_rejected() {
        assert_eq!(escape_identifier("ab\0"), Err(EscapeError::InvalidCharacter(2)));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_string("x\0y"), "x\u{fffd}y");
        assert_eq!(escape_string("line\nbreak"), "line\\a break");
        assert_eq!(escape_string("/path?q=1"), "/path?q=1");
    }
}
