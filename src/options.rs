use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetReport};

/// Limits applied to alias replay to harden against alias bombs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasLimits {
    /// Maximum total number of **replayed** events injected from aliases across the entire parse.
    pub max_total_replayed_events: usize,
    /// Maximum depth of the alias replay stack (nested alias → injected buffer → alias, etc.).
    pub max_replay_stack_depth: usize,
    /// Maximum number of times a **single anchor id** may be expanded via alias.
    /// Use `usize::MAX` for "unlimited".
    pub max_alias_expansions_per_anchor: usize,
}

impl Default for AliasLimits {
    fn default() -> Self {
        Self {
            max_total_replayed_events: 1_000_000,
            max_replay_stack_depth: 64,
            max_alias_expansions_per_anchor: usize::MAX,
        }
    }
}

/// Parser configuration options.
///
/// ```rust
/// use nex_yaml::from_str_with_options;
///
/// let options = nex_yaml::options! {
///     budget: nex_yaml::budget! {
///         max_documents: 2,
///     },
///     strict_booleans: true,
/// };
///
/// let flag: bool = from_str_with_options("true", options).unwrap();
/// assert!(flag);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Optional YAML budget enforced on the raw parser events. `None` disables it.
    pub budget: Option<Budget>,
    /// Invoked with the final budget report, both on success and on breach.
    #[serde(skip)]
    pub budget_report: Option<fn(&BudgetReport)>,
    /// Limits for alias replay to harden against alias bombs.
    pub alias_limits: AliasLimits,
    /// Expand `*alias` references by replaying the anchored node's events.
    /// When false (default), aliases surface as alias events and built-in
    /// formatters reject them.
    pub replay_aliases: bool,
    /// Enable legacy octal parsing where values starting with `0` are treated as base-8.
    /// They are deprecated in YAML 1.2. Default: false.
    pub legacy_octal_numbers: bool,
    /// If true, interpret only `true` and `false` (any case) as booleans.
    /// YAML 1.1 forms like `yes`/`no`/`on`/`off` are rejected.
    /// Default: false.
    pub strict_booleans: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            budget_report: None,
            alias_limits: AliasLimits::default(),
            replay_aliases: false,
            legacy_octal_numbers: false,
            strict_booleans: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert!(opts.budget.is_some());
        assert!(opts.budget_report.is_none());
        assert!(!opts.replay_aliases);
        assert!(!opts.legacy_octal_numbers);
        assert!(!opts.strict_booleans);
        assert_eq!(opts.alias_limits, AliasLimits::default());
    }

    #[test]
    fn test_alias_limits_default() {
        let limits = AliasLimits::default();
        assert_eq!(limits.max_total_replayed_events, 1_000_000);
        assert_eq!(limits.max_replay_stack_depth, 64);
        assert_eq!(limits.max_alias_expansions_per_anchor, usize::MAX);
    }
}
