use std::time::Duration;

use anyhow::Result;
use indoc::indoc;
use nex_yaml::{Decimal, Error, FormatterRegistry, from_str, from_str_with_registry, to_string};

#[derive(Debug, Default, PartialEq)]
struct Job {
    timeout: Duration,
    price: Option<Decimal>,
    window: [u16; 2],
    tags: Box<[String]>,
}

nex_yaml::yaml_object! {
    struct JobFormatter for Job { timeout, price, window, tags }
}

#[test]
fn durations_use_clock_text() -> Result<()> {
    assert_eq!(to_string(&Duration::from_secs(5_400))?, "01:30:00\n");
    assert_eq!(to_string(&Duration::new(90_061, 250_000_000))?, "1.01:01:01.25\n");
    assert_eq!(from_str::<Duration>("\"00:00:02.5\"")?, Duration::from_millis(2_500));

    let err = from_str::<Duration>("90 minutes").unwrap_err();
    assert!(matches!(err, Error::ScalarCoercion { expected: "duration", .. }), "{err}");
    Ok(())
}

#[test]
fn decimals_keep_every_digit() -> Result<()> {
    let exact = "0.1000000000000000000000000001";
    let value: Decimal = from_str(exact)?;
    assert_eq!(value.as_str(), exact);
    assert_eq!(to_string(&value)?, format!("{exact}\n"));
    assert_eq!(from_str::<Decimal>("'-42.50'")?.as_str(), "-42.50");
    assert!(from_str::<Decimal>("1e10").is_err());
    assert!(from_str::<Decimal>("~").is_err());
    Ok(())
}

#[test]
fn arrays_and_boxed_slices_inside_an_object() -> Result<()> {
    let mut registry = FormatterRegistry::new();
    registry.register::<Job>(JobFormatter);
    let yaml = indoc! {"
        timeout: 00:05:00
        price: 19.99
        window: [8, 17]
        tags: [nightly, io]
    "};
    let job: Job = from_str_with_registry(yaml, &registry)?;
    assert_eq!(job.timeout, Duration::from_secs(300));
    assert_eq!(job.price.as_ref().map(Decimal::as_str), Some("19.99"));
    assert_eq!(job.window, [8, 17]);
    assert_eq!(job.tags.len(), 2);

    let written = nex_yaml::to_string_with_registry(&job, &registry)?;
    assert_eq!(
        written,
        indoc! {"
            timeout: 00:05:00
            price: 19.99
            window:
              - 8
              - 17
            tags:
              - nightly
              - io
        "}
    );
    assert_eq!(from_str_with_registry::<Job>(&written, &registry)?, job);

    let err = from_str_with_registry::<Job>("window: [1, 2, 3]\n", &registry).unwrap_err();
    assert!(matches!(err, Error::Structure { .. }), "{err}");
    Ok(())
}

#[cfg(feature = "chrono")]
#[test]
fn chrono_timestamps() -> Result<()> {
    use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

    let utc = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
    assert_eq!(to_string(&utc)?, "2024-02-29T12:30:00Z\n");
    assert_eq!(from_str::<DateTime<Utc>>("2024-02-29 14:30:00+02:00")?, utc);

    let zoned: DateTime<FixedOffset> = from_str("2024-02-29T14:30:00+02:00")?;
    assert_eq!(to_string(&zoned)?, "2024-02-29T14:30:00+02:00\n");
    assert_eq!(zoned, utc);

    let naive: NaiveDateTime = from_str("2024-02-29T12:30:00.5")?;
    assert_eq!(to_string(&naive)?, "2024-02-29T12:30:00.500\n");
    let date: NaiveDate = from_str("2024-02-29")?;
    assert_eq!(to_string(&date)?, "2024-02-29\n");

    let err = from_str::<NaiveDate>("2023-02-29").unwrap_err();
    assert!(matches!(err, Error::ScalarCoercion { expected: "date", .. }), "{err}");
    Ok(())
}

#[cfg(feature = "uuid")]
#[test]
fn uuids() -> Result<()> {
    let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    let id: uuid::Uuid = from_str(&text.to_uppercase())?;
    assert_eq!(to_string(&id)?, format!("{text}\n"));
    assert!(from_str::<uuid::Uuid>("not-a-uuid").is_err());
    Ok(())
}

#[cfg(feature = "url")]
#[test]
fn urls() -> Result<()> {
    let url: url::Url = from_str("HTTPS://Example.com/docs?page=2")?;
    assert_eq!(to_string(&url)?, "https://example.com/docs?page=2\n");
    let with_fragment: url::Url = from_str("'https://example.com/a#top'")?;
    assert_eq!(to_string(&with_fragment)?, "\"https://example.com/a#top\"\n");
    assert!(from_str::<url::Url>("/relative/path").is_err());
    Ok(())
}
