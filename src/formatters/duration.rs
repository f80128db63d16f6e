//! `std::time::Duration` as a `[d.]hh:mm:ss[.fffffffff]` clock string.

use std::time::Duration;

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;

const SECS_PER_DAY: u64 = 86_400;

pub(crate) fn format_duration(value: Duration) -> String {
    let secs = value.as_secs();
    let days = secs / SECS_PER_DAY;
    let hours = secs % SECS_PER_DAY / 3_600;
    let minutes = secs % 3_600 / 60;
    let seconds = secs % 60;
    let mut out = if days > 0 {
        format!("{days}.{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    };
    let nanos = value.subsec_nanos();
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Hours are capped at 23 only when a day count is present.
pub(crate) fn parse_duration(text: &str) -> Option<Duration> {
    let (head, rest) = text.trim().split_once(':')?;
    let (minutes, seconds) = rest.split_once(':')?;
    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => {
            let hours = digits(hours)?;
            if hours > 23 {
                return None;
            }
            (digits(days)?, hours)
        }
        None => (0, digits(head)?),
    };
    let (seconds, fraction) = match seconds.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (seconds, None),
    };
    let minutes = digits(minutes).filter(|&m| m < 60)?;
    let seconds = digits(seconds).filter(|&s| s < 60)?;
    let nanos = match fraction {
        Some(f) if (1..=9).contains(&f.len()) => {
            let scale = 10u32.pow(9 - f.len() as u32);
            u32::try_from(digits(f)?).ok()? * scale
        }
        Some(_) => return None,
        None => 0,
    };
    let secs = days
        .checked_mul(SECS_PER_DAY)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes * 60 + seconds)?;
    Some(Duration::new(secs, nanos))
}

pub(crate) struct DurationFormatter;

impl Formatter<Duration> for DurationFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &Duration, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(&format_duration(*value))
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<Duration> {
        parser.read_scalar_with("duration", parse_duration)
    }
}

impl YamlType for Duration {}
