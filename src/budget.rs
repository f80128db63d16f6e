//! Streaming resource budget for untrusted YAML.
//!
//! The parser feeds every tokenizer event through a [`BudgetEnforcer`] before the
//! event becomes visible to formatters, so pathological inputs are rejected early
//! and without building a tree.

use std::borrow::Cow;
use std::collections::HashSet;

use saphyr_parser::{Event, Parser, ScanError};
use serde::{Deserialize, Serialize};

/// Budgets for a streaming YAML scan.
///
/// The defaults are permissive for typical configuration files while stopping
/// obvious resource-amplifying inputs.
///
/// ```rust
/// use nex_yaml::{Budget, Options};
///
/// let options = Options {
///     budget: Some(Budget {
///         max_depth: 16,
///         ..Budget::default()
///     }),
///     ..Options::default()
/// };
/// let list: Vec<i32> = nex_yaml::from_str_with_options("[1, 2, 3]", options).unwrap();
/// assert_eq!(list, vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Maximum total parser events (counting every event).
    ///
    /// Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of alias (`*ref`) events allowed.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximal total number of anchors (distinct `&anchor` definitions).
    ///
    /// Default: 50,000
    pub max_anchors: usize,
    /// Maximum structural nesting depth (sequences + mappings).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream.
    ///
    /// Default: 1,024
    pub max_documents: usize,
    /// Maximum number of *nodes* (SequenceStart/MappingStart/Scalar).
    ///
    /// Default: 250,000
    pub max_nodes: usize,
    /// Maximum total bytes of scalar contents.
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
    /// If `true`, flag inputs that use far more aliases than anchors.
    ///
    /// Default: true
    pub enforce_alias_anchor_ratio: bool,
    /// Aliases required before the ratio heuristic is evaluated.
    ///
    /// Default: 100
    pub alias_anchor_min_aliases: usize,
    /// A breach occurs when `aliases > alias_anchor_ratio_multiplier * anchors`.
    ///
    /// Default: 10
    pub alias_anchor_ratio_multiplier: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000,
            max_aliases: 50_000,
            max_anchors: 50_000,
            max_depth: 2_000,
            max_documents: 1_024,
            max_nodes: 250_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
            enforce_alias_anchor_ratio: true,
            alias_anchor_min_aliases: 100,
            alias_anchor_ratio_multiplier: 10,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BudgetBreach {
    #[error("too many events ({events})")]
    Events { events: usize },

    #[error("too many aliases ({aliases})")]
    Aliases { aliases: usize },

    #[error("too many anchors ({anchors})")]
    Anchors { anchors: usize },

    /// Depth counts nested `SequenceStart` and `MappingStart` events.
    #[error("nesting depth {depth} exceeds the limit")]
    Depth { depth: usize },

    #[error("too many documents ({documents})")]
    Documents { documents: usize },

    #[error("too many nodes ({nodes})")]
    Nodes { nodes: usize },

    #[error("total scalar size {total_scalar_bytes} bytes exceeds the limit")]
    ScalarBytes { total_scalar_bytes: usize },

    #[error("excessive alias/anchor ratio ({aliases} aliases, {anchors} anchors)")]
    AliasAnchorRatio { aliases: usize, anchors: usize },

    /// A closing event arrived without a matching opening event.
    #[error("unbalanced collection end")]
    Unbalanced,
}

/// Counters collected during a scan.
#[derive(Clone, Debug, Default)]
pub struct BudgetReport {
    /// `Some(..)` if a limit was exceeded.
    pub breached: Option<BudgetBreach>,
    pub events: usize,
    pub aliases: usize,
    pub anchors: usize,
    pub documents: usize,
    pub nodes: usize,
    /// Maximum nesting depth reached at any point.
    pub max_depth: usize,
    pub total_scalar_bytes: usize,
}

/// Stateful helper that enforces a [`Budget`] while consuming a stream of [`Event`]s.
#[derive(Debug)]
pub struct BudgetEnforcer {
    budget: Budget,
    report: BudgetReport,
    depth: usize,
    defined_anchors: HashSet<usize>,
}

impl BudgetEnforcer {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            report: BudgetReport::default(),
            depth: 0,
            defined_anchors: HashSet::with_capacity(64),
        }
    }

    /// Observe a parser [`Event`], updating the internal counters.
    ///
    /// Returns `Err(BudgetBreach)` as soon as a limit is exceeded.
    pub fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        self.report.events += 1;
        if self.report.events > self.budget.max_events {
            return Err(BudgetBreach::Events {
                events: self.report.events,
            });
        }

        match ev {
            Event::DocumentStart(_) => {
                self.report.documents += 1;
                if self.report.documents > self.budget.max_documents {
                    return Err(BudgetBreach::Documents {
                        documents: self.report.documents,
                    });
                }
            }
            Event::Alias(_) => {
                self.report.aliases += 1;
                if self.report.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::Aliases {
                        aliases: self.report.aliases,
                    });
                }
            }
            Event::Scalar(value, _, anchor_id, _) => {
                self.bump_nodes()?;
                let len = match value {
                    Cow::Borrowed(s) => s.len(),
                    Cow::Owned(s) => s.len(),
                };
                self.report.total_scalar_bytes = self.report.total_scalar_bytes.saturating_add(len);
                if self.report.total_scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::ScalarBytes {
                        total_scalar_bytes: self.report.total_scalar_bytes,
                    });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceStart(anchor_id, _) | Event::MappingStart(anchor_id, _) => {
                self.bump_nodes()?;
                self.depth = self.depth.saturating_add(1);
                self.report.max_depth = self.report.max_depth.max(self.depth);
                if self.report.max_depth > self.budget.max_depth {
                    return Err(BudgetBreach::Depth {
                        depth: self.report.max_depth,
                    });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.depth = self.depth.checked_sub(1).ok_or(BudgetBreach::Unbalanced)?;
            }
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd | Event::Nothing => {}
        }

        Ok(())
    }

    fn bump_nodes(&mut self) -> Result<(), BudgetBreach> {
        self.report.nodes += 1;
        if self.report.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::Nodes {
                nodes: self.report.nodes,
            });
        }
        Ok(())
    }

    fn record_anchor(&mut self, anchor_id: usize) -> Result<(), BudgetBreach> {
        if anchor_id != 0 && self.defined_anchors.insert(anchor_id) {
            let count = self.defined_anchors.len();
            if count > self.budget.max_anchors {
                self.report.anchors = count;
                return Err(BudgetBreach::Anchors { anchors: count });
            }
        }
        self.report.anchors = self.defined_anchors.len();
        Ok(())
    }

    /// Run post-scan heuristics and return the report.
    pub fn finalize(mut self) -> BudgetReport {
        self.report.anchors = self.defined_anchors.len();
        if self.report.breached.is_none() {
            self.report.breached = self.ratio_breach();
        }
        self.report
    }

    /// The alias/anchor ratio heuristic; also checked by the parser at stream end.
    pub(crate) fn ratio_breach(&self) -> Option<BudgetBreach> {
        let anchors = self.defined_anchors.len();
        let aliases = self.report.aliases;
        let excessive = self.budget.enforce_alias_anchor_ratio
            && aliases >= self.budget.alias_anchor_min_aliases
            && (anchors == 0 || aliases > self.budget.alias_anchor_ratio_multiplier * anchors);
        excessive.then_some(BudgetBreach::AliasAnchorRatio { aliases, anchors })
    }
}

/// Check an input `&str` against the given `Budget` without deserializing it.
///
/// `Ok(report)` with `report.breached.is_none()` means the input is within budget.
pub fn check_yaml_budget(input: &str, budget: &Budget) -> Result<BudgetReport, ScanError> {
    let parser = Parser::new_from_str(input);
    let mut enforcer = BudgetEnforcer::new(budget.clone());

    for item in parser {
        let (ev, _span) = item?;
        if let Err(breach) = enforcer.observe(&ev) {
            let mut report = enforcer.finalize();
            report.breached = Some(breach);
            return Ok(report);
        }
    }

    Ok(enforcer.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_yaml_ok() {
        let r = check_yaml_budget("a: [1, 2, 3]\n", &Budget::default()).unwrap();
        assert!(r.breached.is_none());
        assert_eq!(r.documents, 1);
        assert_eq!(r.max_depth, 2);
    }

    #[test]
    fn alias_bomb_trips_alias_limit() {
        let y = "root: &A [1, 2]\na: *A\nb: *A\nc: *A\nd: *A\n";
        let b = Budget {
            max_aliases: 3,
            ..Budget::default()
        };
        let rep = check_yaml_budget(y, &b).unwrap();
        assert!(matches!(rep.breached, Some(BudgetBreach::Aliases { .. })));
    }

    #[test]
    fn deep_nesting_trips_depth() {
        let y = format!("{}{}", "[".repeat(200), "]".repeat(200));
        let b = Budget {
            max_depth: 150,
            ..Budget::default()
        };
        let rep = check_yaml_budget(&y, &b).unwrap();
        assert_eq!(rep.breached, Some(BudgetBreach::Depth { depth: 151 }));
    }

    #[test]
    fn anchors_limit_trips() {
        let b = Budget {
            max_anchors: 2,
            ..Budget::default()
        };
        let rep = check_yaml_budget("a: &A 1\nb: &B 2\nc: &C 3\n", &b).unwrap();
        assert_eq!(rep.breached, Some(BudgetBreach::Anchors { anchors: 3 }));
    }

    #[test]
    fn alias_anchor_ratio_trips_when_excessive() {
        let b = Budget {
            alias_anchor_min_aliases: 1,
            alias_anchor_ratio_multiplier: 2,
            ..Budget::default()
        };
        let report = check_yaml_budget("root: &A [1]\na: *A\nb: *A\nc: *A\n", &b).unwrap();
        assert_eq!(
            report.breached,
            Some(BudgetBreach::AliasAnchorRatio {
                aliases: 3,
                anchors: 1
            })
        );
    }
}
