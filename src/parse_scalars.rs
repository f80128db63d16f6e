//! Text-to-number/bool conversions used by scalar coercion.
//!
//! All functions are non-failing: they return `None` when the text is not a valid
//! literal of the requested type, leaving error construction to the caller.

use std::str::FromStr;

use num_traits::Float;

/// YAML 1.2 core booleans: `true`/`false` in any letter case.
pub(crate) fn parse_yaml12_bool(s: &str) -> Option<bool> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a YAML 1.1 boolean (handles the "Norway problem").
///
/// Accepted TRUE literals (case-insensitive): "y", "yes", "true", "on"
/// Accepted FALSE literals (case-insensitive): "n", "no", "false", "off"
pub(crate) fn parse_yaml11_bool(s: &str) -> Option<bool> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("true")
        || t.eq_ignore_ascii_case("yes")
        || t.eq_ignore_ascii_case("y")
        || t.eq_ignore_ascii_case("on")
    {
        Some(true)
    } else if t.eq_ignore_ascii_case("false")
        || t.eq_ignore_ascii_case("no")
        || t.eq_ignore_ascii_case("n")
        || t.eq_ignore_ascii_case("off")
    {
        Some(false)
    } else {
        None
    }
}

fn digit_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some((b - b'0') as u32),
        b'a'..=b'f' => Some(10 + (b - b'a') as u32),
        b'A'..=b'F' => Some(10 + (b - b'A') as u32),
        _ => None,
    }
}

/// Magnitude of `digits` in `radix`; `_` separators are ignored.
fn parse_magnitude(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    let mut saw = false;
    for b in digits.bytes() {
        if b == b'_' {
            continue;
        }
        let d = digit_value(b)?;
        if d >= radix {
            return None;
        }
        val = val.checked_mul(radix as u128)?;
        val = val.checked_add(d as u128)?;
        saw = true;
    }
    saw.then_some(val)
}

/// Split an optional sign and the base prefix off an integer literal.
fn split_integer(s: &str, legacy_octal: bool) -> (bool, u32, &str) {
    let t = s.trim();
    let (neg, rest) = match t.strip_prefix('+') {
        Some(r) => (false, r),
        None => match t.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, t),
        },
    };

    let (radix, digits) = if let Some(r) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16u32, r)
    } else if let Some(r) = rest.strip_prefix("0o").or_else(|| rest.strip_prefix("0O")) {
        (8u32, r)
    } else if let Some(r) = rest.strip_prefix("0b").or_else(|| rest.strip_prefix("0B")) {
        (2u32, r)
    } else if legacy_octal && rest.len() > 1 && rest.starts_with('0') {
        (8u32, &rest[1..])
    } else {
        (10u32, rest)
    };
    (neg, radix, digits)
}

pub(crate) fn parse_int_signed<T>(s: &str, legacy_octal: bool) -> Option<T>
where
    T: TryFrom<i128>,
{
    let (neg, radix, digits) = split_integer(s, legacy_octal);
    let mag = parse_magnitude(digits, radix)?;
    let val: i128 = if neg {
        // i128::MIN has no positive counterpart.
        if mag == i128::MIN.unsigned_abs() {
            i128::MIN
        } else {
            i128::try_from(mag).ok()?.checked_neg()?
        }
    } else {
        i128::try_from(mag).ok()?
    };
    T::try_from(val).ok()
}

pub(crate) fn parse_int_unsigned<T>(s: &str, legacy_octal: bool) -> Option<T>
where
    T: TryFrom<u128>,
{
    let (neg, radix, digits) = split_integer(s, legacy_octal);
    let mag = parse_magnitude(digits, radix)?;
    if neg && mag != 0 {
        return None;
    }
    T::try_from(mag).ok()
}

pub(crate) fn parse_yaml12_f64(s: &str) -> Option<f64> {
    parse_yaml12_float(s)
}

pub(crate) fn parse_yaml12_f32(s: &str) -> Option<f32> {
    parse_yaml12_float(s)
}

/// Parsed at the target width so `f32` is rounded once.
fn parse_yaml12_float<T: Float + FromStr>(s: &str) -> Option<T> {
    let t = s.trim();
    let (negative, body) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    if body.eq_ignore_ascii_case(".nan") {
        return Some(T::nan());
    }
    if body.eq_ignore_ascii_case(".inf") {
        return Some(if negative { T::neg_infinity() } else { T::infinity() });
    }
    // Rust also accepts "inf", "nan" and "infinity", which YAML does not.
    if !t
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-' | b'_'))
    {
        return None;
    }
    if t.contains('_') {
        t.chars().filter(|&c| c != '_').collect::<String>().parse().ok()
    } else {
        t.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_in_every_base() {
        assert_eq!(parse_int_signed::<i32>("0x2A", false), Some(42));
        assert_eq!(parse_int_signed::<i32>("0o52", false), Some(42));
        assert_eq!(parse_int_signed::<i8>("0b1010", false), Some(10));
        assert_eq!(parse_int_signed::<i64>("-0x2A", false), Some(-42));
        assert_eq!(parse_int_signed::<i32>("1_000", false), Some(1000));
        assert_eq!(parse_int_unsigned::<u16>("0052", false), Some(52));
        assert_eq!(parse_int_unsigned::<u16>("0052", true), Some(42));
    }

    #[test]
    fn integer_bounds() {
        assert_eq!(parse_int_signed::<i8>("-128", false), Some(i8::MIN));
        assert_eq!(parse_int_signed::<i8>("128", false), None);
        assert_eq!(
            parse_int_signed::<i128>("-170141183460469231731687303715884105728", false),
            Some(i128::MIN)
        );
        assert_eq!(parse_int_unsigned::<u32>("-1", false), None);
        assert_eq!(parse_int_unsigned::<u32>("-0", false), Some(0));
        assert_eq!(parse_int_signed::<i32>("abc", false), None);
        assert_eq!(parse_int_signed::<i32>("", false), None);
        assert_eq!(parse_int_signed::<i32>("0x", false), None);
    }

    #[test]
    fn special_floats() {
        assert!(parse_yaml12_f64(".NaN").is_some_and(f64::is_nan));
        assert_eq!(parse_yaml12_f64("-.inf"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_yaml12_f64("inf"), None);
        assert_eq!(parse_yaml12_f64("1e3"), Some(1000.0));
        assert_eq!(parse_yaml12_f32("2.5"), Some(2.5));
        assert_eq!(parse_yaml12_f64("+.INF"), Some(f64::INFINITY));
        assert!(parse_yaml12_f32("-.nan").is_some_and(f32::is_nan));
        assert_eq!(parse_yaml12_f64("1_000.5"), Some(1000.5));
        assert_eq!(parse_yaml12_f64("infinity"), None);
        assert_eq!(parse_yaml12_f64("NaN"), None);
        assert_eq!(parse_yaml12_f64("0x10"), None);
    }

    #[test]
    fn f32_is_rounded_once() {
        // Just above the midpoint between 1.0 and the next f32. Going through f64
        // first lands exactly on the midpoint, which then rounds down to 1.0.
        let text = "1.00000005960464477550";
        assert_eq!(parse_yaml12_f32(text), Some(f32::from_bits(0x3F80_0001)));
        assert_ne!(parse_yaml12_f64(text).map(|v| v as f32), parse_yaml12_f32(text));
    }

    #[test]
    fn booleans() {
        assert_eq!(parse_yaml12_bool("TRUE"), Some(true));
        assert_eq!(parse_yaml12_bool("yes"), None);
        assert_eq!(parse_yaml11_bool("Off"), Some(false));
        assert_eq!(parse_yaml11_bool("maybe"), None);
    }
}
