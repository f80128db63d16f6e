use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use nex_yaml::{Budget, BudgetBreach, BudgetReport, Error, check_yaml_budget, from_str_with_options};

fn billion_laughs_yaml(levels: usize, fan_out: usize) -> String {
    let mut yaml = String::new();
    yaml.push_str("l0: &L0 [\"LOL\", \"LOL\"]\n");
    for level in 1..=levels {
        yaml.push_str(&format!("l{level}: &L{level} ["));
        for idx in 0..fan_out {
            if idx > 0 {
                yaml.push_str(", ");
            }
            yaml.push_str(&format!("*L{}", level - 1));
        }
        yaml.push_str("]\n");
    }
    yaml.push_str(&format!("root: *L{levels}\n"));
    yaml
}

fn document_storm_yaml(count: usize) -> String {
    let mut yaml = String::new();
    for idx in 0..count {
        yaml.push_str(&format!("--- \"doc{idx}\"\n"));
    }
    yaml
}

#[test]
fn billion_laughs_is_rejected() -> Result<()> {
    let yaml = billion_laughs_yaml(1, 128);
    let report = check_yaml_budget(&yaml, &Budget::default())?;
    assert!(
        matches!(
            report.breached,
            Some(BudgetBreach::AliasAnchorRatio { aliases, anchors }) if aliases > anchors
        ),
        "expected alias/anchor ratio breach, got {:?}",
        report.breached
    );
    Ok(())
}

#[test]
fn excessive_document_storm_is_rejected() -> Result<()> {
    let limit = Budget::default().max_documents;
    let report = check_yaml_budget(&document_storm_yaml(limit + 1), &Budget::default())?;
    assert!(
        matches!(report.breached, Some(BudgetBreach::Documents { .. })),
        "expected document limit breach, got {:?}",
        report.breached
    );
    Ok(())
}

#[test]
fn depth_breach_stops_the_parser() {
    let yaml = format!("{}1{}", "[".repeat(20), "]".repeat(20));
    let options = nex_yaml::options! {
        budget: nex_yaml::budget! { max_depth: 10 },
    };
    let mut parser = nex_yaml::YamlParser::with_options(&yaml, &options);
    let err = parser.skip_after(nex_yaml::ParseEventType::StreamEnd).unwrap_err();
    match err {
        Error::Budget { breach, location } => {
            assert!(matches!(breach, BudgetBreach::Depth { .. }), "{breach}");
            assert!(location.is_known());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scalar_bytes_breach() {
    let yaml = format!("- {}\n- {}\n", "a".repeat(40), "b".repeat(40));
    let options = nex_yaml::options! {
        budget: nex_yaml::budget! { max_total_scalar_bytes: 64 },
    };
    let err = from_str_with_options::<Vec<String>>(&yaml, options).unwrap_err();
    assert!(
        matches!(err, Error::Budget { breach: BudgetBreach::ScalarBytes { .. }, .. }),
        "{err}"
    );
}

#[test]
fn disabled_budget_allows_deep_input() -> Result<()> {
    let yaml = format!("{}1{}", "[".repeat(20), "]".repeat(20));
    let options = nex_yaml::options! { budget: None };
    let mut parser = nex_yaml::YamlParser::with_options(&yaml, &options);
    assert!(parser.skip_after(nex_yaml::ParseEventType::StreamEnd)?);
    Ok(())
}

static REPORTS: AtomicUsize = AtomicUsize::new(0);
static LAST_EVENTS: AtomicUsize = AtomicUsize::new(0);

fn record(report: &BudgetReport) {
    REPORTS.fetch_add(1, Ordering::SeqCst);
    LAST_EVENTS.store(report.events, Ordering::SeqCst);
}

#[test]
fn report_callback_sees_the_whole_stream() -> Result<()> {
    let options = nex_yaml::options! { budget_report: Some(record) };
    let values: Vec<u8> = from_str_with_options("[1, 2, 3]", options)?;
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(REPORTS.load(Ordering::SeqCst), 1);
    // Stream, document, sequence start/end pairs and three scalars.
    assert_eq!(LAST_EVENTS.load(Ordering::SeqCst), 9);
    Ok(())
}
