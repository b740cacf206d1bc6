//! Navigation guards: the per-navigation composition root.
//!
//! A guard is called once per route transition with the router's current
//! path and returns a [`RouteDecision`] synchronously. It never awaits: the
//! snapshots it reads were refreshed in the background.
//!
//! | Guard | Reads | Before first snapshot | Decision |
//! |-------|-------|-----------------------|----------|
//! | [`MaintenanceRouteGuard`] | [`PolicyCell`] | `Loading` | `Pass` or `Placeholder` |
//! | [`UserRouteGuard`] | [`MenuCell`] | `Loading` (public paths pass) | `Pass` or `Restricted` |
//!
//! [`GuardChain`] runs guards in order and returns the first decision that is
//! not [`RouteDecision::Pass`].
//!
//! # State machine
//!
//! `Loading` is only possible before the first publish; afterwards a guard
//! moves synchronously between `Pass` and a placeholder as paths and
//! snapshots change.

use crate::path::normalize;
use crate::{
    Decision, MaintenanceConfig, MaintenanceRule, MenuCell, PlaceholderKind, PolicyCell,
};
use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════════
// Decisions
// ═══════════════════════════════════════════════════════════════════════════════

/// Props for the external placeholder component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    #[serde(rename = "type")]
    pub kind: PlaceholderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_end_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_href: Option<String>,
}

impl Placeholder {
    /// Placeholder for a matched rule.
    #[must_use]
    pub fn from_rule(rule: &MaintenanceRule) -> Self {
        Self {
            kind: rule.kind,
            title: rule.title.clone(),
            description: rule.description.clone(),
            expected_end_at: rule.expected_end_at.clone(),
            help_text: rule.help_text.clone(),
            help_href: rule.help_href.clone(),
        }
    }

    /// Placeholder for the global switch.
    #[must_use]
    pub fn global(config: &MaintenanceConfig) -> Self {
        Self {
            kind: PlaceholderKind::Maintenance,
            title: config.title.clone(),
            description: config.description.clone(),
            expected_end_at: config.expected_end_at.clone(),
            help_text: config.help_text.clone(),
            help_href: config.help_href.clone(),
        }
    }
}

/// What the router should render for a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteDecision {
    /// Inputs not resolved yet: render nothing / a neutral "checking" state.
    Loading,
    /// Render the real route.
    Pass,
    /// Render the maintenance / coming-soon placeholder.
    Placeholder(Placeholder),
    /// Render the "restricted" placeholder.
    Restricted,
}

impl RouteDecision {
    /// Returns `true` for [`RouteDecision::Pass`].
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` for [`RouteDecision::Loading`].
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RouteGuard trait
// ═══════════════════════════════════════════════════════════════════════════════

/// A synchronous per-navigation check.
///
/// # Example
///
/// ```
/// use navgate::{RouteDecision, RouteGuard};
///
/// struct Closed;
///
/// impl RouteGuard for Closed {
///     fn check(&self, _path: &str) -> RouteDecision {
///         RouteDecision::Restricted
///     }
/// }
///
/// assert_eq!(Closed.check("/x"), RouteDecision::Restricted);
/// ```
pub trait RouteGuard: Send + Sync {
    /// Decide what to render for the router's current path.
    fn check(&self, path: &str) -> RouteDecision;

    /// Guard name for logs.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MaintenanceRouteGuard
// ═══════════════════════════════════════════════════════════════════════════════

/// Replaces pages with a maintenance / coming-soon placeholder.
///
/// Renders [`RouteDecision::Loading`] until the first config fetch has
/// resolved (success or fail-open), so a page is never flashed and then
/// replaced.
#[derive(Debug, Clone)]
pub struct MaintenanceRouteGuard {
    policy: PolicyCell,
}

impl MaintenanceRouteGuard {
    /// Create a guard reading from `policy`.
    #[must_use]
    pub fn new(policy: PolicyCell) -> Self {
        Self { policy }
    }

    /// The maintenance-level decision, or `None` while loading.
    #[must_use]
    pub fn decision(&self, path: &str) -> Option<Decision> {
        self.policy.load().map(|policy| policy.evaluate(path))
    }
}

impl RouteGuard for MaintenanceRouteGuard {
    fn check(&self, path: &str) -> RouteDecision {
        let Some(policy) = self.policy.load() else {
            return RouteDecision::Loading;
        };
        match policy.evaluate(path) {
            Decision::Pass => RouteDecision::Pass,
            Decision::GlobalMaintenance => {
                tracing::debug!(path, "global maintenance placeholder");
                RouteDecision::Placeholder(Placeholder::global(policy.config()))
            }
            Decision::RuleMatch { rule } => {
                tracing::debug!(path, rule_id = %rule.id, "maintenance rule placeholder");
                RouteDecision::Placeholder(Placeholder::from_rule(&rule))
            }
        }
    }

    fn name(&self) -> &'static str {
        "MaintenanceRouteGuard"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// UserRouteGuard
// ═══════════════════════════════════════════════════════════════════════════════

/// Gates non-public pages on the menu access index.
///
/// A menu fetch that never succeeds leaves the guard in
/// [`RouteDecision::Loading`]: this gate does not fail open.
#[derive(Debug, Clone)]
pub struct UserRouteGuard {
    menu: MenuCell,
    public_paths: Vec<String>,
}

impl UserRouteGuard {
    /// Create a guard reading from `menu` with no public paths.
    #[must_use]
    pub fn new(menu: MenuCell) -> Self {
        Self {
            menu,
            public_paths: Vec::new(),
        }
    }

    /// Add paths that bypass the menu index (exact match, normalized).
    #[must_use]
    pub fn with_public_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.public_paths
            .extend(paths.into_iter().map(|p| normalize(p.as_ref())));
        self
    }

    /// Whether `path` is on the public allow-list.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        let path = normalize(path);
        self.public_paths.iter().any(|p| *p == path)
    }

    /// Access check for navigation affordances (menus, links).
    ///
    /// Agrees with [`check`](RouteGuard::check): `true` exactly when the
    /// guard would render the page. `false` while the menu is loading.
    #[must_use]
    pub fn has_path_access(&self, path: &str) -> bool {
        self.check(path).is_pass()
    }
}

impl RouteGuard for UserRouteGuard {
    fn check(&self, path: &str) -> RouteDecision {
        if self.is_public(path) {
            return RouteDecision::Pass;
        }
        let Some(index) = self.menu.load() else {
            return RouteDecision::Loading;
        };
        if index.has_access(path) {
            RouteDecision::Pass
        } else {
            tracing::debug!(path, "path not covered by any menu entry");
            RouteDecision::Restricted
        }
    }

    fn name(&self) -> &'static str {
        "UserRouteGuard"
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// GuardChain
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs guards in order; the first non-`Pass` decision wins.
///
/// An empty chain passes everything.
#[derive(Default)]
pub struct GuardChain {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardChain {
    /// An empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guard (builder pattern).
    #[must_use]
    pub fn with(mut self, guard: impl RouteGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Number of guards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns `true` if the chain has no guards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl RouteGuard for GuardChain {
    fn check(&self, path: &str) -> RouteDecision {
        for guard in &self.guards {
            let decision = guard.check(path);
            if !decision.is_pass() {
                tracing::trace!(path, guard = guard.name(), ?decision, "guard chain stopped");
                return decision;
            }
        }
        RouteDecision::Pass
    }

    fn name(&self) -> &'static str {
        "GuardChain"
    }
}

impl std::fmt::Debug for GuardChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.guards.iter().map(|g| g.name()).collect();
        f.debug_struct("GuardChain").field("guards", &names).finish()
    }
}
