//! Maintenance decisions: admin bypass, global switch, rule selection
//!
//! Evaluation order is fixed:
//!
//! 1. a path under `adminBypassPrefix` passes, unconditionally
//! 2. `enabled = true` blocks every other path with the global notice
//! 3. otherwise the matching enabled rule with the lowest priority wins,
//!    ties going to the rule listed first
//!
//! The free functions work directly on a [`MaintenanceConfig`].
//! [`MaintenancePolicy`] is the compiled snapshot guards evaluate against:
//! regexes are compiled once per config and rules are pre-sorted.

use crate::path::normalize;
use crate::rule_matcher::matches;
use crate::trace::{PolicyTrace, RuleTrace};
use crate::{MaintenanceConfig, MaintenanceRule, PathMatcher};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Outcome of evaluating one navigated path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Render the real route.
    Pass,
    /// The global switch is on.
    GlobalMaintenance,
    /// A single rule was selected.
    RuleMatch {
        /// The winning rule.
        rule: MaintenanceRule,
    },
}

impl Decision {
    /// Returns `true` for [`Decision::Pass`].
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The selected rule, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&MaintenanceRule> {
        match self {
            Self::RuleMatch { rule } => Some(rule),
            _ => None,
        }
    }
}

/// Select the winning rule for an already-normalized `path`.
///
/// Does **not** look at `config.enabled` or the admin prefix; callers check
/// those first (see [`evaluate`]).
#[must_use]
pub fn select_rule<'a>(path: &str, config: &'a MaintenanceConfig) -> Option<&'a MaintenanceRule> {
    // min_by_key keeps the first of equal minima, i.e. a stable sort's head.
    config
        .rules
        .iter()
        .filter(|rule| matches(path, rule))
        .min_by_key(|rule| rule.effective_priority())
}

/// Full decision for a raw navigated path.
///
/// # Example
///
/// ```
/// use navgate::{evaluate, Decision, MaintenanceConfig, MaintenanceRule, MatchType};
///
/// let config = MaintenanceConfig::default()
///     .with_rules(vec![MaintenanceRule::new("home", MatchType::Exact, "/")]);
///
/// assert!(matches!(evaluate("/", &config), Decision::RuleMatch { .. }));
/// assert_eq!(evaluate("/about", &config), Decision::Pass);
/// assert_eq!(evaluate("/admin/anything", &config), Decision::Pass);
/// ```
#[must_use]
pub fn evaluate(raw_path: &str, config: &MaintenanceConfig) -> Decision {
    let path = normalize(raw_path);
    if config.is_admin_path(&path) {
        return Decision::Pass;
    }
    if config.enabled {
        return Decision::GlobalMaintenance;
    }
    select_rule(&path, config).map_or(Decision::Pass, |rule| Decision::RuleMatch {
        rule: rule.clone(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// MaintenancePolicy
// ═══════════════════════════════════════════════════════════════════════════════

struct CompiledRule {
    /// Index into `config.rules`.
    index: usize,
    matcher: Box<dyn PathMatcher>,
}

/// A compiled, immutable maintenance snapshot.
///
/// Built once per fetched [`MaintenanceConfig`]; a new config means a new
/// policy, so compiled regexes never outlive the rule text they came from.
///
/// # INV: agrees with [`evaluate`]
///
/// `policy.evaluate(p) == evaluate(p, policy.config())` for every path.
pub struct MaintenancePolicy {
    config: MaintenanceConfig,
    /// Enabled rules, stably sorted by ascending priority.
    compiled: Vec<CompiledRule>,
}

impl MaintenancePolicy {
    /// Compile a configuration.
    #[must_use]
    pub fn new(config: MaintenanceConfig) -> Self {
        let mut compiled: Vec<CompiledRule> = config
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.enabled)
            .map(|(index, rule)| CompiledRule {
                index,
                matcher: rule.compile(),
            })
            .collect();
        // sort_by_key is stable: equal priorities keep list order.
        compiled.sort_by_key(|c| config.rules[c.index].effective_priority());

        Self { config, compiled }
    }

    /// The fully-open policy used before the first fetch and on failure.
    #[must_use]
    pub fn open() -> Self {
        Self::new(MaintenanceConfig::default())
    }

    /// The configuration this policy was compiled from.
    #[must_use]
    pub fn config(&self) -> &MaintenanceConfig {
        &self.config
    }

    /// Effective poll cadence for the next refresh.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }

    /// Winning rule for an already-normalized path.
    #[must_use]
    pub fn select_rule(&self, path: &str) -> Option<&MaintenanceRule> {
        self.compiled
            .iter()
            .find(|c| c.matcher.matches(path))
            .map(|c| &self.config.rules[c.index])
    }

    /// Full decision for a raw navigated path.
    #[must_use]
    pub fn evaluate(&self, raw_path: &str) -> Decision {
        let path = normalize(raw_path);
        if self.config.is_admin_path(&path) {
            return Decision::Pass;
        }
        if self.config.enabled {
            return Decision::GlobalMaintenance;
        }
        self.select_rule(&path)
            .map_or(Decision::Pass, |rule| Decision::RuleMatch { rule: rule.clone() })
    }

    /// Evaluate and record every step.
    ///
    /// Every enabled rule is checked (no short-circuit) so the trace shows
    /// all candidates, not only the winner. `trace.decision` equals
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn evaluate_with_trace(&self, raw_path: &str) -> PolicyTrace {
        let path = normalize(raw_path);

        if self.config.is_admin_path(&path) {
            return PolicyTrace {
                path,
                admin_bypass: true,
                global: false,
                rules: Vec::new(),
                decision: Decision::Pass,
            };
        }
        if self.config.enabled {
            return PolicyTrace {
                path,
                admin_bypass: false,
                global: true,
                rules: Vec::new(),
                decision: Decision::GlobalMaintenance,
            };
        }

        let rules: Vec<RuleTrace> = self
            .compiled
            .iter()
            .map(|c| {
                let rule = &self.config.rules[c.index];
                RuleTrace {
                    id: rule.id.clone(),
                    priority: rule.effective_priority(),
                    matched: c.matcher.matches(&path),
                }
            })
            .collect();

        let decision = rules
            .iter()
            .zip(&self.compiled)
            .find(|(t, _)| t.matched)
            .map_or(Decision::Pass, |(_, c)| Decision::RuleMatch {
                rule: self.config.rules[c.index].clone(),
            });

        PolicyTrace {
            path,
            admin_bypass: false,
            global: false,
            rules,
            decision,
        }
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns `true` if no rule is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

impl Default for MaintenancePolicy {
    fn default() -> Self {
        Self::open()
    }
}

impl From<MaintenanceConfig> for MaintenancePolicy {
    fn from(config: MaintenanceConfig) -> Self {
        Self::new(config)
    }
}

impl fmt::Debug for MaintenancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaintenancePolicy")
            .field("enabled", &self.config.enabled)
            .field("admin_bypass_prefix", &self.config.admin_bypass_prefix)
            .field("rules_len", &self.config.rules.len())
            .field("compiled_len", &self.compiled.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MatchType, PlaceholderKind};

    fn prefix(id: &str, path: &str, priority: i32) -> MaintenanceRule {
        MaintenanceRule::new(id, MatchType::Prefix, path).with_priority(priority)
    }

    #[test]
    fn lower_priority_wins_regardless_of_order() {
        let a = prefix("p100", "/board", 100);
        let b = prefix("p50", "/board", 50);

        for rules in [vec![a.clone(), b.clone()], vec![b.clone(), a.clone()]] {
            let config = MaintenanceConfig::default().with_rules(rules);
            assert_eq!(select_rule("/board/list", &config).unwrap().id, "p50");
            let policy = MaintenancePolicy::new(config);
            assert_eq!(policy.select_rule("/board/list").unwrap().id, "p50");
        }
    }

    #[test]
    fn equal_priority_keeps_list_order() {
        let config = MaintenanceConfig::default().with_rules(vec![
            prefix("first", "/", 10),
            prefix("second", "/board", 10),
        ]);
        assert_eq!(select_rule("/board", &config).unwrap().id, "first");
        assert_eq!(
            MaintenancePolicy::new(config).select_rule("/board").unwrap().id,
            "first"
        );
    }

    #[test]
    fn missing_priority_defaults_to_100() {
        let config = MaintenanceConfig::default().with_rules(vec![
            MaintenanceRule::new("implicit", MatchType::Prefix, "/"),
            prefix("explicit", "/", 99),
        ]);
        assert_eq!(select_rule("/x", &config).unwrap().id, "explicit");
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = MaintenanceConfig::default().with_rules(vec![
            prefix("off", "/", 1).disabled(),
            prefix("on", "/", 200),
        ]);
        assert_eq!(select_rule("/x", &config).unwrap().id, "on");
        let policy = MaintenancePolicy::new(config);
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.select_rule("/x").unwrap().id, "on");
    }

    #[test]
    fn no_match_is_none() {
        let config = MaintenanceConfig::default().with_rules(vec![prefix("b", "/board", 1)]);
        assert!(select_rule("/about", &config).is_none());
        assert_eq!(evaluate("/about", &config), Decision::Pass);
    }

    #[test]
    fn admin_bypass_short_circuits_global() {
        let config = MaintenanceConfig::default().globally_enabled();
        assert_eq!(evaluate("/admin/board", &config), Decision::Pass);
        assert_eq!(evaluate("/admin", &config), Decision::Pass);
        assert_eq!(evaluate("/board", &config), Decision::GlobalMaintenance);
        assert_eq!(evaluate("/administrator", &config), Decision::GlobalMaintenance);
    }

    #[test]
    fn global_ignores_rules() {
        let config = MaintenanceConfig::default()
            .globally_enabled()
            .with_rules(vec![prefix("r", "/", 1)]);
        assert_eq!(evaluate("/x", &config), Decision::GlobalMaintenance);
    }

    #[test]
    fn default_config_passes_everything() {
        let config = MaintenanceConfig::default();
        for path in ["", "/", "/anything", "board/list"] {
            assert_eq!(evaluate(path, &config), Decision::Pass);
            assert_eq!(MaintenancePolicy::open().evaluate(path), Decision::Pass);
        }
    }

    #[test]
    fn end_to_end_root_exact_rule() {
        let rule = MaintenanceRule::new("r1", MatchType::Exact, "/")
            .with_kind(PlaceholderKind::ComingSoon)
            .with_priority(10);
        let config = MaintenanceConfig::default().with_rules(vec![rule.clone()]);
        let policy = MaintenancePolicy::new(config.clone());

        let expected = Decision::RuleMatch { rule };
        assert_eq!(evaluate("/", &config), expected);
        assert_eq!(policy.evaluate("/"), expected);
        for path in ["/about", "/admin/anything"] {
            assert_eq!(evaluate(path, &config), Decision::Pass);
            assert_eq!(policy.evaluate(path), Decision::Pass);
        }
    }

    #[test]
    fn malformed_rule_does_not_poison_the_set() {
        let config = MaintenanceConfig::default().with_rules(vec![
            MaintenanceRule::new("bad", MatchType::Regex, "(").with_priority(1),
            prefix("good", "/shop", 50),
        ]);
        let policy = MaintenancePolicy::new(config.clone());
        assert_eq!(policy.evaluate("/shop/1").rule().unwrap().id, "good");
        assert_eq!(evaluate("/shop/1", &config).rule().unwrap().id, "good");
        assert!(policy.evaluate("/(").is_pass());
    }

    #[test]
    fn trace_agrees_with_evaluate() {
        let config = MaintenanceConfig::default().with_rules(vec![
            prefix("wide", "/", 100),
            prefix("narrow", "/shop", 5),
            MaintenanceRule::new("never", MatchType::Regex, "("),
        ]);
        let policy = MaintenancePolicy::new(config);

        for path in ["/", "/shop", "/shop/1", "/admin/x", "/about"] {
            let trace = policy.evaluate_with_trace(path);
            assert_eq!(trace.decision, policy.evaluate(path), "path {path}");
        }

        let trace = policy.evaluate_with_trace("/shop/1");
        assert!(!trace.admin_bypass);
        assert_eq!(trace.rules.len(), 3);
        assert_eq!(trace.rules[0].id, "narrow");
        assert!(trace.rules[0].matched);
        assert!(trace.rules[1].matched);
        assert!(!trace.rules[2].matched);
        assert_eq!(trace.matched_ids(), vec!["narrow", "wide"]);
    }

    #[test]
    fn trace_records_bypass_and_global() {
        let policy = MaintenancePolicy::new(MaintenanceConfig::default().globally_enabled());
        let trace = policy.evaluate_with_trace("/admin/");
        assert!(trace.admin_bypass);
        assert_eq!(trace.path, "/admin");

        let trace = policy.evaluate_with_trace("/x");
        assert!(trace.global);
        assert_eq!(trace.decision, Decision::GlobalMaintenance);
    }

    #[test]
    fn decision_serializes_with_kind_tag() {
        let value = serde_json::to_value(Decision::Pass).unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "PASS" }));

        let value = serde_json::to_value(Decision::GlobalMaintenance).unwrap();
        assert_eq!(value["kind"], "GLOBAL_MAINTENANCE");

        let rule = MaintenanceRule::new("r1", MatchType::Exact, "/");
        let value = serde_json::to_value(Decision::RuleMatch { rule }).unwrap();
        assert_eq!(value["kind"], "RULE_MATCH");
        assert_eq!(value["rule"]["id"], "r1");
    }
}
