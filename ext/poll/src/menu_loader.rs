//! One-shot loading of the user menu into a [`MenuCell`].
//!
//! Menu access fails closed: a failed load leaves the cell as it was, so a
//! guard that never saw a menu keeps rendering `Loading`.

use crate::source::{FetchError, MenuSource};
use navgate::{IndexMode, MenuAccessIndex, MenuCell};
use std::sync::Arc;

/// Fetches the menu forest and publishes a rebuilt [`MenuAccessIndex`].
pub struct MenuLoader {
    source: Arc<dyn MenuSource>,
    cell: MenuCell,
    mode: IndexMode,
}

impl MenuLoader {
    /// Create a loader publishing into `cell` in [`IndexMode::UsableOnly`].
    pub fn new(source: impl MenuSource + 'static, cell: MenuCell) -> Self {
        Self {
            source: Arc::new(source),
            cell,
            mode: IndexMode::default(),
        }
    }

    /// Set the index mode (builder pattern).
    #[must_use]
    pub fn with_mode(mut self, mode: IndexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fetch, index and publish. Returns the number of indexed entries.
    ///
    /// Every call rebuilds the index from scratch; nothing from a previous
    /// load carries over.
    ///
    /// # Errors
    ///
    /// Returns the [`FetchError`] from the source. The cell is untouched.
    pub async fn load(&self) -> Result<usize, FetchError> {
        let only_usable = self.mode == IndexMode::UsableOnly;
        match self.source.fetch_menu(only_usable).await {
            Ok(forest) => {
                let index = MenuAccessIndex::build(&forest, self.mode);
                let indexed = index.len();
                self.cell.publish(index);
                tracing::debug!(indexed, roots = forest.len(), "user menu loaded");
                Ok(indexed)
            }
            Err(err) => {
                tracing::warn!(error = %err, resolved = self.cell.is_resolved(), "user menu fetch failed");
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for MenuLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuLoader")
            .field("cell", &self.cell)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
