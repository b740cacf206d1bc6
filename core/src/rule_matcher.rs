//! Rule compilation: `MatchType` + path → runtime [`PathMatcher`]
//!
//! A [`MaintenanceRule`] is the operator's *intent* ("prefix match on /shop").
//! [`MatchType::to_path_matcher`] turns that intent into the matcher that runs
//! on every navigation. Compilation is the only fallible step; evaluation
//! never fails.

use crate::{
    ExactPathMatcher, MaintenanceRule, MatchType, NeverMatcher, PathMatcher, PolicyError,
    PrefixPathMatcher, RegexPathMatcher, MAX_PATTERN_LENGTH, MAX_REGEX_PATTERN_LENGTH,
};

impl MatchType {
    /// Compile `pattern` into a runtime [`PathMatcher`].
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidPattern`] if a regex does not compile or the
    ///   match type is [`MatchType::Unknown`]
    /// - [`PolicyError::PatternTooLong`] if the pattern exceeds
    ///   [`MAX_PATTERN_LENGTH`] / [`MAX_REGEX_PATTERN_LENGTH`]
    pub fn to_path_matcher(&self, pattern: &str) -> Result<Box<dyn PathMatcher>, PolicyError> {
        let max = match self {
            Self::Regex => MAX_REGEX_PATTERN_LENGTH,
            _ => MAX_PATTERN_LENGTH,
        };
        if pattern.len() > max {
            return Err(PolicyError::PatternTooLong {
                len: pattern.len(),
                max,
            });
        }

        match self {
            Self::Exact => Ok(Box::new(ExactPathMatcher::new(pattern))),
            Self::Prefix => Ok(Box::new(PrefixPathMatcher::new(pattern))),
            Self::Regex => RegexPathMatcher::new(pattern)
                .map(|m| Box::new(m) as Box<dyn PathMatcher>)
                .map_err(|e| PolicyError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source: e.to_string(),
                }),
            Self::Unknown => Err(PolicyError::InvalidPattern {
                pattern: pattern.to_string(),
                source: "unknown match type".to_string(),
            }),
        }
    }
}

impl MaintenanceRule {
    /// Compile this rule, degrading to [`NeverMatcher`] when it is disabled or
    /// malformed.
    ///
    /// A malformed rule is logged and neutralized; it never invalidates the
    /// rest of the rule set.
    #[must_use]
    pub fn compile(&self) -> Box<dyn PathMatcher> {
        if !self.enabled {
            return Box::new(NeverMatcher);
        }
        match self.match_type.to_path_matcher(&self.path) {
            Ok(matcher) => matcher,
            Err(err) => {
                tracing::warn!(rule_id = %self.id, error = %err, "maintenance rule never matches");
                Box::new(NeverMatcher)
            }
        }
    }
}

/// Whether `rule` applies to an already-normalized `path`.
///
/// Compiles the rule on every call; hot paths should go through
/// [`MaintenancePolicy`](crate::MaintenancePolicy), which compiles once per
/// config snapshot.
///
/// # Example
///
/// ```
/// use navgate::{matches, MaintenanceRule, MatchType};
///
/// let rule = MaintenanceRule::new("r1", MatchType::Prefix, "/board");
/// assert!(matches("/board/list", &rule));
/// assert!(!matches("/boarding", &rule));
/// ```
#[must_use]
pub fn matches(path: &str, rule: &MaintenanceRule) -> bool {
    if !rule.enabled {
        return false;
    }
    rule.match_type
        .to_path_matcher(&rule.path)
        .is_ok_and(|m| m.matches(path))
}
