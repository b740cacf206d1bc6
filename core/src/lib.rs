//! navgate - client-side navigation access control
//!
//! Decides, for every route transition, whether a visitor sees the page, a
//! "coming soon / under maintenance" placeholder, or a restricted notice.
//!
//! # Architecture
//!
//! Two independently refreshed rule sets feed one synchronous decision:
//!
//! - [`normalize`] - Canonical path form shared by every evaluator
//! - [`PathMatcher`] - Runtime EXACT / PREFIX / REGEX matching on normalized paths
//! - [`MaintenancePolicy`] - Compiled maintenance snapshot: admin bypass, global switch, priority-ordered rules
//! - [`MenuAccessIndex`] - Arena over the user menu tree, answers "is this path covered"
//! - [`SnapshotCell`] - Lock-free single-writer/many-reader slot for the two snapshots
//! - [`RouteGuard`] - Per-navigation composition ([`MaintenanceRouteGuard`], [`UserRouteGuard`], [`GuardChain`])
//!
//! # Key Design Insights
//!
//! 1. **Evaluation never fails**: malformed rules degrade to "never matches"
//!    at compile time; errors exist only while loading config.
//!
//! 2. **Evaluation never awaits**: refreshing snapshots is somebody else's
//!    job (see the `navgate-poll` crate). A guard only loads the latest
//!    snapshot and decides.
//!
//! 3. **Asymmetric failure**: maintenance gating fails open, menu access
//!    does not. A guard whose cell was never published renders `Loading`.
//!
//! # Example
//!
//! ```
//! use navgate::prelude::*;
//!
//! let config = MaintenanceConfig::from_json(r#"{
//!     "enabled": false,
//!     "rules": [
//!         { "id": "r1", "enabled": true, "matchType": "EXACT", "path": "/",
//!           "type": "COMING_SOON", "priority": 10 }
//!     ]
//! }"#).unwrap();
//!
//! let guard = MaintenanceRouteGuard::new(PolicyCell::resolved(MaintenancePolicy::new(config)));
//!
//! assert!(matches!(guard.check("/"), RouteDecision::Placeholder(_)));
//! assert_eq!(guard.check("/about"), RouteDecision::Pass);
//! assert_eq!(guard.check("/admin/anything"), RouteDecision::Pass);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod access_index;
mod cell;
mod config;
mod guard;
mod menu;
mod path;
mod path_matcher;
mod policy;
mod rule_matcher;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Paths
pub use path::{is_under, normalize};

// Matching
pub use path_matcher::{
    ExactPathMatcher, NeverMatcher, PathMatcher, PrefixPathMatcher, RegexPathMatcher,
};
pub use rule_matcher::matches;

// Maintenance
pub use config::{
    MaintenanceConfig, MaintenanceRule, MatchType, PlaceholderKind, DEFAULT_ADMIN_BYPASS_PREFIX,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_PRIORITY, MIN_POLL_INTERVAL_SECS,
};
pub use policy::{evaluate, select_rule, Decision, MaintenancePolicy};
pub use trace::{PolicyTrace, RuleTrace};

// Menu access
pub use access_index::{derive_base_paths, IndexMode, MenuAccessIndex, DETAIL_SUFFIXES};
pub use menu::{assemble_tree, UseFlag, UserMenuNode};

// Snapshots and guards
pub use cell::{MenuCell, PolicyCell, SnapshotCell};
pub use guard::{
    GuardChain, MaintenanceRouteGuard, Placeholder, RouteDecision, RouteGuard, UserRouteGuard,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use navgate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Decision, GuardChain, IndexMode, MaintenanceConfig, MaintenancePolicy,
        MaintenanceRouteGuard, MaintenanceRule, MatchType, MenuAccessIndex, MenuCell,
        PlaceholderKind, PolicyCell, PolicyError, RouteDecision, RouteGuard, UserMenuNode,
        UserRouteGuard,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length for EXACT and PREFIX rule paths.
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for REGEX rule paths.
///
/// Shorter than [`MAX_PATTERN_LENGTH`] because regex compilation cost grows
/// faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from config loading and rule compilation.
///
/// Never produced during evaluation: a rule that fails to compile is
/// neutralized instead (see [`MaintenanceRule::compile`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A rule pattern could not be compiled.
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying error message.
        source: String,
    },
    /// A config payload did not have the expected shape.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
    /// A rule pattern exceeds the maximum allowed length.
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern \"{pattern}\": {source}")
            }
            Self::InvalidConfig { source } => {
                write!(f, "invalid config: {source}")
            }
            Self::PatternTooLong { len, max } => {
                write!(f, "pattern length is {len}, but maximum allowed is {max}")
            }
        }
    }
}

impl std::error::Error for PolicyError {}
