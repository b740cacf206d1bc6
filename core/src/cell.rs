//! Shared snapshot cells.
//!
//! One writer (the poller or menu loader) publishes whole snapshots; any
//! number of readers load the latest one without locking. An empty cell means
//! "not resolved yet" and guards render [`RouteDecision::Loading`](crate::RouteDecision::Loading)
//! until the first publish.

use crate::{MaintenancePolicy, MenuAccessIndex};
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::Arc;

/// A cloneable handle to an atomically swapped `Option<Arc<T>>`.
///
/// Clones share the same slot. Last write wins.
pub struct SnapshotCell<T> {
    slot: Arc<ArcSwapOption<T>>,
}

/// Cell holding the current maintenance policy.
pub type PolicyCell = SnapshotCell<MaintenancePolicy>;

/// Cell holding the current menu access index.
pub type MenuCell = SnapshotCell<MenuAccessIndex>;

impl<T> SnapshotCell<T> {
    /// An unresolved cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// A cell already holding `value`.
    #[must_use]
    pub fn resolved(value: T) -> Self {
        let cell = Self::new();
        cell.publish(value);
        cell
    }

    /// Replace the current snapshot.
    pub fn publish(&self, value: T) {
        self.publish_arc(Arc::new(value));
    }

    /// Replace the current snapshot with an already shared value.
    pub fn publish_arc(&self, value: Arc<T>) {
        self.slot.store(Some(value));
    }

    /// The latest snapshot, or `None` before the first publish.
    #[must_use]
    pub fn load(&self) -> Option<Arc<T>> {
        self.slot.load_full()
    }

    /// Returns `true` once something has been published.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.slot.load().is_some()
    }
}

impl<T> Clone for SnapshotCell<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SnapshotCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotCell")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
