//! Timestamps through `chrono`.
//!
//! Zoned values are written as RFC 3339. Reading also accepts the YAML timestamp
//! spelling with a space before the time, and a timestamp without an offset is
//! taken as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::context::{DeserializationContext, SerializationContext};
use crate::emitter::Emitter;
use crate::error::Result;
use crate::formatter::{Formatter, YamlType};
use crate::parser::YamlParser;
use crate::registry::FormatterRegistry;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let t = text.trim();
    DateTime::parse_from_rfc3339(t)
        .or_else(|_| DateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .or_else(|| parse_naive(t).map(|naive| naive.and_utc().fixed_offset()))
}

pub(crate) struct UtcFormatter;

impl Formatter<DateTime<Utc>> for UtcFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &DateTime<Utc>, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<DateTime<Utc>> {
        parser.read_scalar_with("timestamp", |text| parse_timestamp(text).map(|t| t.with_timezone(&Utc)))
    }
}

pub(crate) struct OffsetFormatter;

impl Formatter<DateTime<FixedOffset>> for OffsetFormatter {
    fn serialize(
        &self,
        emitter: &mut Emitter,
        value: &DateTime<FixedOffset>,
        _ctx: &mut SerializationContext<'_>,
    ) -> Result<()> {
        emitter.write_string(&value.to_rfc3339_opts(SecondsFormat::AutoSi, false))
    }

    fn deserialize(
        &self,
        parser: &mut YamlParser<'_>,
        _ctx: &mut DeserializationContext<'_>,
    ) -> Result<DateTime<FixedOffset>> {
        parser.read_scalar_with("timestamp", parse_timestamp)
    }
}

pub(crate) struct NaiveDateTimeFormatter;

impl Formatter<NaiveDateTime> for NaiveDateTimeFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &NaiveDateTime, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(&value.format(NAIVE_FORMATS[0]).to_string())
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<NaiveDateTime> {
        parser.read_scalar_with("local timestamp", |text| parse_naive(text.trim()))
    }
}

pub(crate) struct NaiveDateFormatter;

impl Formatter<NaiveDate> for NaiveDateFormatter {
    fn serialize(&self, emitter: &mut Emitter, value: &NaiveDate, _ctx: &mut SerializationContext<'_>) -> Result<()> {
        emitter.write_string(&value.format("%Y-%m-%d").to_string())
    }

    fn deserialize(&self, parser: &mut YamlParser<'_>, _ctx: &mut DeserializationContext<'_>) -> Result<NaiveDate> {
        parser.read_scalar_with("date", |text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok())
    }
}

impl YamlType for DateTime<Utc> {}
impl YamlType for DateTime<FixedOffset> {}
impl YamlType for NaiveDateTime {}
impl YamlType for NaiveDate {}

pub(super) fn register(registry: &mut FormatterRegistry) {
    registry.register::<DateTime<Utc>>(UtcFormatter);
    registry.register::<DateTime<FixedOffset>>(OffsetFormatter);
    registry.register::<NaiveDateTime>(NaiveDateTimeFormatter);
    registry.register::<NaiveDate>(NaiveDateFormatter);
}
