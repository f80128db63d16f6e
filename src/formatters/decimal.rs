use std::fmt;
use std::str::FromStr;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;

/// A base-10 number kept as its exact text, so no digit is lost to binary floating point.
///
/// Accepts an optional sign, digits, and an optional fraction: `-12.50`, `+3`, `.5`.
/// Exponents and `_` separators are rejected. A leading `+` is dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }
}

fn is_decimal_literal(s: &str) -> bool {
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim();
        if !is_decimal_literal(t) {
            return Err(Error::msg(format!("`{s}` is not a decimal number")));
        }
        Ok(Decimal(t.strip_prefix('+').unwrap_or(t).to_owned()))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(value.to_string())
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal(value.to_string())
    }
}

impl YamlType for Decimal {}

pub(crate) struct DecimalFormatter;

impl Formatter<Decimal> for DecimalFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &Decimal, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_plain(value.as_str())
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<Decimal> {
        parser.read_scalar_with("decimal", |text| text.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        for ok in ["0", "-12.50", "+3", ".5", "5.", "123456789012345678901234567890.000000001"] {
            assert!(ok.parse::<Decimal>().is_ok(), "{ok:?}");
        }
        for bad in ["", ".", "-", "1e3", "1_000", "1.2.3", "0x10", ".inf", "one"] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad:?}");
        }
        let plus: Decimal = "+3.10".parse().unwrap();
        assert_eq!(plus.as_str(), "3.10");
        assert!(!plus.is_negative());
        assert_eq!(Decimal::from(-7i64).to_string(), "-7");
    }
}
