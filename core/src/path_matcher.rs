//! `PathMatcher`: runtime matching against a normalized path
//!
//! Rules are compiled once into one of these matchers (see
//! [`MatchType::to_path_matcher`](crate::MatchType::to_path_matcher)) and then
//! evaluated on every navigation without further allocation or compilation.
//!
//! # Available Matchers
//!
//! - [`ExactPathMatcher`] - equality with a normalized path
//! - [`PrefixPathMatcher`] - segment-aware prefix, `/` matches everything
//! - [`RegexPathMatcher`] - regular expression, unanchored
//! - [`NeverMatcher`] - stands in for malformed or unknown rules

use crate::path::{is_under, normalize};
use std::fmt::Debug;

/// Matches a path that has already been through [`normalize`].
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: compiled policies are published as
/// shared snapshots and read from any thread.
///
/// # Example
///
/// ```
/// use navgate::{PathMatcher, PrefixPathMatcher};
///
/// let matcher = PrefixPathMatcher::new("/board/");
/// assert!(matcher.matches("/board/list"));
/// assert!(!matcher.matches("/boarding"));
/// ```
pub trait PathMatcher: Send + Sync + Debug {
    /// Check if the normalized path matches.
    fn matches(&self, path: &str) -> bool;
}

impl PathMatcher for Box<dyn PathMatcher> {
    fn matches(&self, path: &str) -> bool {
        (**self).matches(path)
    }
}

/// Exact equality with a normalized literal.
///
/// The literal is normalized at construction, so `/board/` and `/board`
/// are the same rule.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    expected: String,
}

impl ExactPathMatcher {
    /// Create a new exact matcher; `expected` is normalized.
    pub fn new(expected: &str) -> Self {
        Self {
            expected: normalize(expected),
        }
    }

    /// Returns the normalized literal.
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl PathMatcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.expected
    }
}

/// Segment-aware prefix matcher.
///
/// A normalized prefix of `/` matches every path. Any other prefix matches
/// the prefix itself and anything below it (`prefix + "/"`), never a sibling
/// that merely shares leading characters.
///
/// ```
/// use navgate::{PathMatcher, PrefixPathMatcher};
///
/// let global = PrefixPathMatcher::new("");
/// assert!(global.matches("/anything/at/all"));
///
/// let board = PrefixPathMatcher::new("/board");
/// assert!(board.matches("/board"));
/// assert!(!board.matches("/board2"));
/// ```
#[derive(Debug, Clone)]
pub struct PrefixPathMatcher {
    prefix: String,
}

impl PrefixPathMatcher {
    /// Create a new prefix matcher; `prefix` is normalized.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: normalize(prefix),
        }
    }

    /// Returns the normalized prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl PathMatcher for PrefixPathMatcher {
    fn matches(&self, path: &str) -> bool {
        self.prefix == "/" || is_under(path, &self.prefix)
    }
}

/// Regular expression matcher (Rust `regex` crate, linear time).
///
/// The pattern is tested against the normalized path with `is_match`, so it
/// is unanchored unless the pattern anchors itself.
#[derive(Debug, Clone)]
pub struct RegexPathMatcher {
    regex: regex::Regex,
}

impl RegexPathMatcher {
    /// Compile a regex matcher.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        regex::Regex::new(pattern).map(|regex| Self { regex })
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl PathMatcher for RegexPathMatcher {
    fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Matches nothing.
///
/// Malformed regexes, over-long patterns and unknown match types compile to
/// this so a single bad rule cannot take down the rest of the rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverMatcher;

impl PathMatcher for NeverMatcher {
    fn matches(&self, _path: &str) -> bool {
        false
    }
}
