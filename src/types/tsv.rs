//! TabSeparated escaping rules.
//!
//! ClickHouse escapes tab, newline and backslash (plus a handful of control
//! characters) inside TabSeparated fields so that `\t` and `\n` stay
//! unambiguous delimiters.

/// Text ClickHouse writes for NULL in TabSeparated output.
pub const NULL_FIELD: &str = "\\N";

/// Field delimiter.
pub const FIELD_SEPARATOR: char = '\t';

/// Row delimiter.
pub const ROW_SEPARATOR: char = '\n';

/// Decode the escape sequences of a TabSeparated field.
///
/// Unknown sequences decode to the escaped character itself, a trailing lone
/// backslash is kept as is.
pub fn unescape(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Escape a value for use as a TabSeparated field.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode one row of values as a newline-terminated TabSeparated line.
pub fn encode_row<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut line = values
        .into_iter()
        .map(|v| escape(v.as_ref()))
        .collect::<Vec<_>>()
        .join("\t");
    line.push(ROW_SEPARATOR);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_plain_text() {
        assert_eq!(unescape("hello"), "hello");
        assert_eq!(unescape(""), "");
    }

    #[test]
    fn test_unescape_sequences() {
        assert_eq!(unescape("a\\tb"), "a\tb");
        assert_eq!(unescape("line\\nbreak"), "line\nbreak");
        assert_eq!(unescape("back\\\\slash"), "back\\slash");
        assert_eq!(unescape("it\\'s"), "it's");
        assert_eq!(unescape("nul\\0"), "nul\0");
    }

    #[test]
    fn test_unescape_trailing_backslash() {
        assert_eq!(unescape("end\\"), "end\\");
    }

    #[test]
    fn test_escape_delimiters() {
        assert_eq!(escape("a\tb\nc"), "a\\tb\\nc");
        assert_eq!(escape("C:\\dir"), "C:\\\\dir");
    }

    #[test]
    fn test_encode_row() {
        assert_eq!(encode_row(["1", "x\ty"]), "1\tx\\ty\n");
        assert_eq!(encode_row(Vec::<String>::new()), "\n");
    }
}
