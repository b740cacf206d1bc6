//! Menu-derived access index.
//!
//! Built once from a fetched menu tree. Each navigable node contributes one
//! or more *base paths*; a navigated path is covered when it equals a base or
//! lives below one. The tree is flattened into an arena at build time and
//! queried with an explicit stack, so lookups never recurse.
//!
//! # Base path derivation
//!
//! A node at `/notice/list` yields `/notice/list` and `/notice`: registering
//! the listing screen also grants its sibling detail screens. The known
//! suffixes are [`DETAIL_SUFFIXES`].
//!
//! # Root base
//!
//! A base of `/` only covers `/` itself. A root-registered menu is never an
//! unrestricted prefix grant.

use crate::path::{is_under, normalize};
use crate::UserMenuNode;
use std::fmt;

/// Suffixes stripped from menu URLs to derive list/detail base paths.
///
/// Longer suffixes come first so `/x/board-list` strips to `/x`.
pub const DETAIL_SUFFIXES: &[&str] = &["/board-list", "/board-detail", "/list", "/detail"];

/// Which nodes contribute base paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexMode {
    /// Only nodes with `useTf = 'Y'`.
    #[default]
    UsableOnly,
    /// Every node with a URL.
    All,
}

#[derive(Debug, Clone)]
struct IndexNode {
    menu_id: String,
    bases: Vec<String>,
    children: Vec<usize>,
}

/// Answers "is this path covered by some enabled menu entry".
///
/// # Example
///
/// ```
/// use navgate::{IndexMode, MenuAccessIndex, UserMenuNode};
///
/// let index = MenuAccessIndex::build(&[UserMenuNode::new("1", "/notice")], IndexMode::UsableOnly);
///
/// assert!(index.has_access("/notice"));
/// assert!(index.has_access("/notice/list"));
/// assert!(index.has_access("/notice/detail/42"));
/// assert!(!index.has_access("/notice2"));
/// ```
#[derive(Clone)]
pub struct MenuAccessIndex {
    nodes: Vec<IndexNode>,
    roots: Vec<usize>,
    mode: IndexMode,
}

impl MenuAccessIndex {
    /// Flatten a menu forest into an index.
    #[must_use]
    pub fn build(tree: &[UserMenuNode], mode: IndexMode) -> Self {
        let mut index = Self {
            nodes: Vec::new(),
            roots: Vec::with_capacity(tree.len()),
            mode,
        };
        for node in tree {
            let id = index.insert(node);
            index.roots.push(id);
        }
        tracing::debug!(
            nodes = index.nodes.len(),
            bases = index.base_paths().count(),
            ?mode,
            "menu access index built"
        );
        index
    }

    /// An index that grants nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::build(&[], IndexMode::default())
    }

    fn insert(&mut self, node: &UserMenuNode) -> usize {
        let contributes = match self.mode {
            IndexMode::UsableOnly => node.use_tf.is_usable(),
            IndexMode::All => true,
        };
        let bases = if contributes {
            node.url.as_deref().map(derive_base_paths).unwrap_or_default()
        } else {
            Vec::new()
        };

        let id = self.nodes.len();
        self.nodes.push(IndexNode {
            menu_id: node.id.clone(),
            bases,
            children: Vec::with_capacity(node.children.len()),
        });
        for child in &node.children {
            let child_id = self.insert(child);
            self.nodes[id].children.push(child_id);
        }
        id
    }

    /// Whether a raw navigated path is covered by any entry in the tree.
    #[must_use]
    pub fn has_access(&self, raw_path: &str) -> bool {
        self.covering_menu(raw_path).is_some()
    }

    /// Id of the first entry (depth-first, pre-order) that covers the path.
    ///
    /// Children are searched whether or not their parent matched: access is
    /// a union over the whole tree.
    #[must_use]
    pub fn covering_menu(&self, raw_path: &str) -> Option<&str> {
        let path = normalize(raw_path);
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if node.bases.iter().any(|base| covers(base, &path)) {
                return Some(&node.menu_id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Every derived base path, in tree order.
    pub fn base_paths(&self) -> impl Iterator<Item = &str> {
        self.nodes
            .iter()
            .flat_map(|n| n.bases.iter().map(String::as_str))
    }

    /// Number of nodes in the source tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the source tree was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The mode this index was built with.
    #[must_use]
    pub fn mode(&self) -> IndexMode {
        self.mode
    }
}

impl Default for MenuAccessIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for MenuAccessIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuAccessIndex")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots.len())
            .field("mode", &self.mode)
            .finish()
    }
}

fn covers(base: &str, path: &str) -> bool {
    if base == "/" {
        path == "/"
    } else {
        is_under(path, base)
    }
}

/// Base paths granted by one menu URL.
///
/// Query strings and fragments are ignored. A blank URL grants nothing.
///
/// ```
/// use navgate::derive_base_paths;
///
/// assert_eq!(derive_base_paths("/notice/list"), vec!["/notice/list", "/notice"]);
/// assert_eq!(derive_base_paths("/qna/board-detail/"), vec!["/qna/board-detail", "/qna"]);
/// assert_eq!(derive_base_paths("/list"), vec!["/list"]);
/// assert!(derive_base_paths("  ").is_empty());
/// ```
#[must_use]
pub fn derive_base_paths(url: &str) -> Vec<String> {
    let url = url
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim();
    if url.is_empty() {
        return Vec::new();
    }

    let base = normalize(url);
    let mut bases = vec![base.clone()];
    for suffix in DETAIL_SUFFIXES {
        if let Some(rest) = base.strip_suffix(suffix) {
            if rest.is_empty() {
                continue;
            }
            let rest = normalize(rest);
            if !bases.contains(&rest) {
                bases.push(rest);
            }
        }
    }
    bases
}
