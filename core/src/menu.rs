//! Menu tree wire types.
//!
//! The menu endpoint returns an owned forest: every node exclusively owns its
//! `children`. [`assemble_tree`] builds the same shape from a flat list keyed
//! by `parentId`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// `useTf` flag: whether the menu entry is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UseFlag {
    Y,
    #[default]
    N,
}

impl UseFlag {
    /// Returns `true` for [`UseFlag::Y`].
    #[must_use]
    pub fn is_usable(self) -> bool {
        self == Self::Y
    }
}

impl From<String> for UseFlag {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("Y") {
            Self::Y
        } else {
            Self::N
        }
    }
}

impl From<UseFlag> for String {
    fn from(flag: UseFlag) -> Self {
        match flag {
            UseFlag::Y => "Y".to_string(),
            UseFlag::N => "N".to_string(),
        }
    }
}

impl From<bool> for UseFlag {
    fn from(usable: bool) -> Self {
        if usable {
            Self::Y
        } else {
            Self::N
        }
    }
}

/// One entry of the user menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMenuNode {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// `None` for non-navigable category nodes.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub parent_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub depth: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub order_seq: i32,
    #[serde(default, deserialize_with = "nullable")]
    pub use_tf: UseFlag,
    #[serde(default, deserialize_with = "nullable")]
    pub children: Vec<UserMenuNode>,
}

impl UserMenuNode {
    /// A usable leaf with the given URL.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            url: Some(url.into()),
            parent_id: None,
            depth: 0,
            order_seq: 0,
            use_tf: UseFlag::Y,
            children: Vec::new(),
        }
    }

    /// A usable category node without a URL.
    pub fn category(id: impl Into<String>) -> Self {
        Self {
            url: None,
            ..Self::new(id, String::new())
        }
    }

    /// Set the `useTf` flag (builder pattern).
    #[must_use]
    pub fn with_use(mut self, usable: bool) -> Self {
        self.use_tf = usable.into();
        self
    }

    /// Set the parent id (builder pattern).
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Set the sibling order (builder pattern).
    #[must_use]
    pub fn with_order(mut self, order_seq: i32) -> Self {
        self.order_seq = order_seq;
        self
    }

    /// Append a child (builder pattern).
    #[must_use]
    pub fn with_child(mut self, child: UserMenuNode) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_len).sum::<usize>()
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

/// Build an owned forest from a flat node list.
///
/// - a node whose `parentId` is absent, unknown or itself becomes a root
/// - siblings are ordered by `orderSeq`, then `id`
/// - nodes that can only be reached through a parent cycle are dropped
/// - any `children` already present on the input nodes are replaced
///
/// When two nodes share an id, children attach to the first one.
#[must_use]
pub fn assemble_tree(flat: Vec<UserMenuNode>) -> Vec<UserMenuNode> {
    let mut by_id: HashMap<&str, usize> = HashMap::with_capacity(flat.len());
    for (i, node) in flat.iter().enumerate() {
        by_id.entry(node.id.as_str()).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut roots = Vec::new();
    for (i, node) in flat.iter().enumerate() {
        match node.parent_id.as_deref().and_then(|p| by_id.get(p)) {
            Some(&parent) if parent != i => children[parent].push(i),
            _ => roots.push(i),
        }
    }
    drop(by_id);

    let mut slots: Vec<Option<UserMenuNode>> = flat.into_iter().map(Some).collect();
    let mut forest: Vec<UserMenuNode> = roots
        .into_iter()
        .filter_map(|i| take_subtree(i, &mut slots, &children))
        .collect();
    sort_siblings(&mut forest);
    forest
}

fn take_subtree(
    index: usize,
    slots: &mut [Option<UserMenuNode>],
    children: &[Vec<usize>],
) -> Option<UserMenuNode> {
    let mut node = slots[index].take()?;
    node.children = children[index]
        .iter()
        .filter_map(|&c| take_subtree(c, slots, children))
        .collect();
    sort_siblings(&mut node.children);
    Some(node)
}

fn sort_siblings(nodes: &mut [UserMenuNode]) {
    nodes.sort_by(|a, b| a.order_seq.cmp(&b.order_seq).then_with(|| a.id.cmp(&b.id)));
}
