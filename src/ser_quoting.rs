//! Controls quoting behavior of the emitter.

use std::fmt::Write;

const INDICATORS: &[u8] = b"-?:[]{}#&*!|>'\"%@`";

fn starts_with_indicator_or_space(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes[0].is_ascii_whitespace() || INDICATORS.contains(&bytes[0])
}

fn looks_like_null_or_bool(s: &str) -> bool {
    s == "~"
        || s.eq_ignore_ascii_case("null")
        || s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("false")
        // YAML 1.1 boolean aliases that some parsers accept
        || s.eq_ignore_ascii_case("y")
        || s.eq_ignore_ascii_case("yes")
        || s.eq_ignore_ascii_case("n")
        || s.eq_ignore_ascii_case("no")
        || s.eq_ignore_ascii_case("on")
        || s.eq_ignore_ascii_case("off")
}

/// `---` and `...` at the start of a line open and close documents.
fn looks_like_document_marker(s: &str) -> bool {
    ["---", "..."].iter().any(|marker| {
        s.strip_prefix(marker)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace()))
    })
}

fn looks_like_number(s: &str) -> bool {
    if s.parse::<i64>().is_ok() || s.parse::<u64>().is_ok() || s.parse::<f64>().is_ok() {
        return true;
    }
    [".nan", ".inf", "-.inf", "+.inf"]
        .iter()
        .any(|special| s.eq_ignore_ascii_case(special))
}

/// Returns true if `s` can be emitted as a plain scalar in VALUE position without quoting.
///
/// Tokens that would read back as null, a boolean or a number are rejected so that
/// strings keep their type on the round trip.
pub(crate) fn is_plain_value_safe(s: &str) -> bool {
    if s.is_empty() || looks_like_null_or_bool(s) || looks_like_number(s) || looks_like_document_marker(s) {
        return false;
    }
    if starts_with_indicator_or_space(s) || s.ends_with(|c: char| c.is_whitespace()) {
        return false;
    }
    // Colon is fine, colon followed by space is not.
    if s.contains(": ") || s.ends_with(':') {
        return false;
    }
    !contains_any_or_is_control(s, &[',', '[', ']', '{', '}', '#'])
}

/// Stricter variant for mapping keys: no ':' or '#' anywhere.
pub(crate) fn is_plain_key_safe(s: &str) -> bool {
    is_plain_value_safe(s) && !s.contains(':')
}

/// True if the string contains single quotes, backslashes, or control characters
/// that need escape processing.
pub(crate) fn needs_double_quotes(s: &str) -> bool {
    s.chars().any(|c| c == '\'' || c == '\\' || c.is_control())
}

fn contains_any_or_is_control(string: &str, values: &[char]) -> bool {
    string.chars().any(|x| x.is_control() || values.contains(&x))
}

/// Single quotes inside the string are escaped by doubling them.
pub(crate) fn write_single_quoted(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
}

/// Write a double-quoted string with necessary escapes.
pub(crate) fn write_double_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\u{FEFF}' => out.push_str("\\uFEFF"),
            '\u{0085}' => out.push_str("\\N"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if (c as u32) <= 0xFF && c.is_control() => {
                // Writing into a String cannot fail.
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
