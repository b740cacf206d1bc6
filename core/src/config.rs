//! Wire types for the maintenance configuration.
//!
//! The remote endpoint returns camelCase JSON. Every field is optional on the
//! wire; deserialization goes through private `Wire*` mirrors whose `From`
//! impls merge the payload over the defaults, so `null` and "absent" behave
//! the same way.
//!
//! ```json
//! {
//!   "enabled": false,
//!   "pollIntervalSec": 30,
//!   "adminBypassPrefix": "/admin",
//!   "rules": [
//!     { "id": "r1", "enabled": true, "matchType": "PREFIX", "path": "/shop",
//!       "type": "COMING_SOON", "title": "Opening soon", "priority": 10 }
//!   ]
//! }
//! ```

use crate::path::{is_under, normalize};
use crate::PolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Priority assigned to rules that do not carry one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Poll cadence when the payload does not specify one.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Floor applied to `pollIntervalSec`.
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

/// Prefix that is never gated unless the payload overrides it.
pub const DEFAULT_ADMIN_BYPASS_PREFIX: &str = "/admin";

// ═══════════════════════════════════════════════════════════════════════════════
// Enums
// ═══════════════════════════════════════════════════════════════════════════════

/// How a rule's `path` is interpreted.
///
/// Unrecognized strings deserialize to [`MatchType::Unknown`], which never
/// matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Equality with the normalized rule path.
    Exact,
    /// Segment-aware prefix of the normalized rule path.
    Prefix,
    /// Regular expression over the normalized navigated path.
    Regex,
    /// Anything else the backend sent.
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "EXACT",
            Self::Prefix => "PREFIX",
            Self::Regex => "REGEX",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Which placeholder presentation a consumer should render.
///
/// Carried through untouched by the engine. Unknown values fall back to
/// [`PlaceholderKind::ComingSoon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlaceholderKind {
    Maintenance,
    #[default]
    ComingSoon,
    Notice,
}

impl PlaceholderKind {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maintenance => "MAINTENANCE",
            Self::ComingSoon => "COMING_SOON",
            Self::Notice => "NOTICE",
        }
    }
}

impl From<String> for PlaceholderKind {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "MAINTENANCE" => Self::Maintenance,
            "NOTICE" => Self::Notice,
            _ => Self::ComingSoon,
        }
    }
}

impl From<PlaceholderKind> for String {
    fn from(kind: PlaceholderKind) -> Self {
        kind.as_str().to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MaintenanceRule
// ═══════════════════════════════════════════════════════════════════════════════

/// One operator-authored path rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireRule")]
pub struct MaintenanceRule {
    /// Stable identity used by the admin screens.
    pub id: String,
    /// Disabled rules never match.
    pub enabled: bool,
    pub match_type: MatchType,
    /// Literal path, prefix or regex source depending on `match_type`.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: PlaceholderKind,
    pub title: Option<String>,
    pub description: Option<String>,
    pub help_text: Option<String>,
    pub help_href: Option<String>,
    /// ISO-8601, display only.
    pub expected_end_at: Option<String>,
    /// Lower wins. `None` means [`DEFAULT_PRIORITY`].
    pub priority: Option<i32>,
}

impl MaintenanceRule {
    /// Create an enabled rule with defaults for everything but the match.
    pub fn new(id: impl Into<String>, match_type: MatchType, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            match_type,
            path: path.into(),
            kind: PlaceholderKind::default(),
            title: None,
            description: None,
            help_text: None,
            help_href: None,
            expected_end_at: None,
            priority: None,
        }
    }

    /// Set the priority (builder pattern).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the placeholder kind (builder pattern).
    #[must_use]
    pub fn with_kind(mut self, kind: PlaceholderKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the title (builder pattern).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Mark the rule disabled (builder pattern).
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Priority used for tie-breaking.
    #[must_use]
    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRule {
    #[serde(default, deserialize_with = "crate::menu::optional_id_string")]
    id: Option<String>,
    enabled: Option<bool>,
    match_type: Option<MatchType>,
    path: Option<String>,
    #[serde(rename = "type")]
    kind: Option<PlaceholderKind>,
    title: Option<String>,
    description: Option<String>,
    help_text: Option<String>,
    help_href: Option<String>,
    expected_end_at: Option<String>,
    priority: Option<i32>,
}

impl From<WireRule> for MaintenanceRule {
    fn from(wire: WireRule) -> Self {
        Self {
            id: wire.id.unwrap_or_default(),
            enabled: wire.enabled.unwrap_or(false),
            match_type: wire.match_type.unwrap_or_default(),
            path: wire.path.unwrap_or_default(),
            kind: wire.kind.unwrap_or_default(),
            title: wire.title,
            description: wire.description,
            help_text: wire.help_text,
            help_href: wire.help_href,
            expected_end_at: wire.expected_end_at,
            priority: wire.priority,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MaintenanceConfig
// ═══════════════════════════════════════════════════════════════════════════════

/// The whole remotely-managed maintenance configuration.
///
/// [`MaintenanceConfig::default`] is the fully-open configuration published
/// before the first fetch resolves and after fetch failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireConfig")]
pub struct MaintenanceConfig {
    /// Global kill-switch: blocks every non-admin path.
    pub enabled: bool,
    /// Cadence from the payload, rounded to whole seconds; see
    /// [`poll_interval`](Self::poll_interval) for the floor.
    pub poll_interval_sec: u64,
    /// Normalized prefix exempt from all gating.
    pub admin_bypass_prefix: String,
    /// Order carries no meaning; priority does.
    pub rules: Vec<MaintenanceRule>,
    /// Global notice text.
    pub title: Option<String>,
    pub description: Option<String>,
    pub help_text: Option<String>,
    pub help_href: Option<String>,
    pub expected_end_at: Option<String>,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_sec: DEFAULT_POLL_INTERVAL_SECS,
            admin_bypass_prefix: DEFAULT_ADMIN_BYPASS_PREFIX.to_string(),
            rules: Vec::new(),
            title: None,
            description: None,
            help_text: None,
            help_href: None,
            expected_end_at: None,
        }
    }
}

impl MaintenanceConfig {
    /// Parse a JSON payload, merging it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfig`] if the body is not JSON or a
    /// top-level field has the wrong shape (e.g. `rules` is not an array).
    /// A single misshapen rule is dropped and logged instead, and a
    /// non-numeric `pollIntervalSec` falls back to the default.
    pub fn from_json(body: &str) -> Result<Self, PolicyError> {
        serde_json::from_str(body).map_err(|e| PolicyError::InvalidConfig {
            source: e.to_string(),
        })
    }

    /// Same as [`from_json`](Self::from_json) for an already-parsed value.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidConfig`] on a shape mismatch.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PolicyError> {
        serde_json::from_value(value).map_err(|e| PolicyError::InvalidConfig {
            source: e.to_string(),
        })
    }

    /// Effective poll cadence, floored at [`MIN_POLL_INTERVAL_SECS`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_sec.max(MIN_POLL_INTERVAL_SECS))
    }

    /// Whether a normalized path is under the admin bypass prefix.
    #[must_use]
    pub fn is_admin_path(&self, path: &str) -> bool {
        is_under(path, &self.admin_bypass_prefix)
    }

    /// Set the rules (builder pattern).
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<MaintenanceRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Turn the global switch on (builder pattern).
    #[must_use]
    pub fn globally_enabled(mut self) -> Self {
        self.enabled = true;
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
    enabled: Option<bool>,
    poll_interval_sec: Option<serde_json::Value>,
    admin_bypass_prefix: Option<String>,
    rules: Option<Vec<serde_json::Value>>,
    title: Option<String>,
    description: Option<String>,
    help_text: Option<String>,
    help_href: Option<String>,
    expected_end_at: Option<String>,
}

impl From<WireConfig> for MaintenanceConfig {
    fn from(wire: WireConfig) -> Self {
        let defaults = Self::default();
        let admin_bypass_prefix = wire
            .admin_bypass_prefix
            .filter(|p| !p.trim().is_empty())
            .map_or(defaults.admin_bypass_prefix, |p| normalize(p.trim()));

        Self {
            enabled: wire.enabled.unwrap_or(defaults.enabled),
            poll_interval_sec: wire
                .poll_interval_sec
                .as_ref()
                .and_then(interval_secs)
                .unwrap_or(defaults.poll_interval_sec),
            admin_bypass_prefix,
            rules: wire.rules.map(decode_rules).unwrap_or_default(),
            title: wire.title,
            description: wire.description,
            help_text: wire.help_text,
            help_href: wire.help_href,
            expected_end_at: wire.expected_end_at,
        }
    }
}

/// Whole seconds from a numeric `pollIntervalSec`. Non-positive values clamp
/// to the floor, fractions round. `None` for non-numbers.
fn interval_secs(raw: &serde_json::Value) -> Option<u64> {
    let secs = raw.as_f64()?;
    if !secs.is_finite() || secs <= 0.0 {
        return Some(MIN_POLL_INTERVAL_SECS);
    }
    // float -> int casts saturate
    Some(secs.round() as u64)
}

/// Decode rules one by one. A rule of the wrong shape is dropped and logged;
/// the rest of the set survives.
fn decode_rules(raw: Vec<serde_json::Value>) -> Vec<MaintenanceRule> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(rule_index, value)| match MaintenanceRule::deserialize(value) {
            Ok(rule) => Some(rule),
            Err(err) => {
                tracing::warn!(rule_index, error = %err, "malformed maintenance rule dropped");
                None
            }
        })
        .collect()
}
