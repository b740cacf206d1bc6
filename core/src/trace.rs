//! Evaluation trace types for debugging maintenance decisions.
//!
//! [`PolicyTrace`] mirrors the evaluation order of
//! [`MaintenancePolicy::evaluate`](crate::MaintenancePolicy::evaluate) but
//! records each step instead of stopping at the first answer. Use it from
//! admin tooling to explain why a page shows a placeholder.
//!
//! # Example
//!
//! ```
//! use navgate::{MaintenanceConfig, MaintenancePolicy, MaintenanceRule, MatchType};
//!
//! let policy = MaintenancePolicy::new(MaintenanceConfig::default().with_rules(vec![
//!     MaintenanceRule::new("shop", MatchType::Prefix, "/shop"),
//! ]));
//!
//! let trace = policy.evaluate_with_trace("/shop/cart");
//! assert_eq!(trace.matched_ids(), vec!["shop"]);
//! ```

use crate::Decision;
use serde::Serialize;
use std::fmt;

/// One rule checked during a traced evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleTrace {
    /// Rule identity.
    pub id: String,
    /// Effective priority (default applied).
    pub priority: i32,
    /// Whether the rule matched the normalized path.
    pub matched: bool,
}

/// Trace of a full maintenance evaluation.
///
/// # INV: `decision` == `evaluate()` result
///
/// The trace never changes the outcome, it only exposes how it was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyTrace {
    /// The normalized path that was evaluated.
    pub path: String,
    /// The admin prefix short-circuited evaluation.
    pub admin_bypass: bool,
    /// The global switch short-circuited evaluation.
    pub global: bool,
    /// Enabled rules in evaluation order (ascending priority).
    pub rules: Vec<RuleTrace>,
    /// Final decision.
    pub decision: Decision,
}

impl PolicyTrace {
    /// Ids of every rule that matched, winner first.
    #[must_use]
    pub fn matched_ids(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.matched)
            .map(|r| r.id.as_str())
            .collect()
    }
}

impl fmt::Display for PolicyTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "path {}", self.path)?;
        if self.admin_bypass {
            return writeln!(f, "  admin bypass -> PASS");
        }
        if self.global {
            return writeln!(f, "  global maintenance -> GLOBAL_MAINTENANCE");
        }
        for rule in &self.rules {
            writeln!(
                f,
                "  [{}] priority={} matched={}",
                rule.id, rule.priority, rule.matched
            )?;
        }
        match &self.decision {
            Decision::RuleMatch { rule } => writeln!(f, "  -> RULE_MATCH({})", rule.id),
            Decision::GlobalMaintenance => writeln!(f, "  -> GLOBAL_MAINTENANCE"),
            Decision::Pass => writeln!(f, "  -> PASS"),
        }
    }
}
