//! Delimiter escaping for raw string literals.

use std::borrow::Cow;

/// Textual escape written in place of `delimiter` inside a literal body.
///
/// Characters on the basic multilingual plane use the four digit `\uXXXX` form, anything above it
/// the eight digit `\UXXXXXXXX` form.
pub fn delimiter_escape(delimiter: char) -> String {
    let code = delimiter as u32;
    if code <= 0xFFFF {
        format!("\\u{code:04x}")
    } else {
        format!("\\U{code:08x}")
    }
}

/// Whether `delimiter` can close a literal without ever appearing in its own escape sequence.
pub fn is_valid_delimiter(delimiter: char) -> bool {
    !delimiter.is_whitespace()
        && !delimiter.is_control()
        && !delimiter_escape(delimiter).contains(delimiter)
}

/// Replace every occurrence of `delimiter` with its escape so the literal stays closed.
pub fn escape_delimiter(content: &str, delimiter: char) -> Cow<'_, str> {
    if content.contains(delimiter) {
        Cow::Owned(content.replace(delimiter, &delimiter_escape(delimiter)))
    } else {
        Cow::Borrowed(content)
    }
}

/// Undo [`escape_delimiter`].
///
/// Text that already contained the escape sequence before escaping is indistinguishable from an
/// escaped delimiter and is turned into the delimiter as well.
pub fn restore_delimiters(escaped: &str, delimiter: char) -> String {
    escaped.replace(&delimiter_escape(delimiter), &delimiter.to_string())
}
