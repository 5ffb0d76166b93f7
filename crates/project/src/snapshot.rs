use lsldetails_core::{EnumerationFilter, NodeHandle, NodeKind};
use serde::{Deserialize, Serialize};

/// Faults injected into the host calls made for one node.
/// 針對單一節點注入的主機呼叫錯誤。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeFaults {
    #[serde(default)]
    pub caption_read: bool,
    #[serde(default)]
    pub caption_write: bool,
    #[serde(default)]
    pub deferred_read: bool,
    #[serde(default)]
    pub kind_read: bool,
    #[serde(default)]
    pub name_read: bool,
}

impl NodeFaults {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One entry of the solution tree.
/// 方案樹中的一個節點。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotNode {
    pub caption: String,
    /// Canonical name; the caption is reported when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: NodeKind,
    /// `None` while the host has not resolved the load state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deferred: Option<bool>,
    #[serde(default = "default_root")]
    pub root: bool,
    #[serde(default, skip_serializing_if = "NodeFaults::is_empty")]
    pub faults: NodeFaults,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SnapshotNode>,
}

fn default_kind() -> NodeKind {
    NodeKind::Project
}

fn default_root() -> bool {
    true
}

impl SnapshotNode {
    pub fn project(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            name: None,
            kind: NodeKind::Project,
            deferred: Some(false),
            root: true,
            faults: NodeFaults::default(),
            children: Vec::new(),
        }
    }

    pub fn deferred(caption: impl Into<String>) -> Self {
        Self {
            deferred: Some(true),
            ..Self::project(caption)
        }
    }

    pub fn folder(caption: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::VirtualFolder,
            deferred: None,
            ..Self::project(caption)
        }
    }

    pub fn item(caption: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Other,
            deferred: None,
            root: false,
            ..Self::project(caption)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_faults(mut self, faults: NodeFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn with_children(mut self, children: Vec<SnapshotNode>) -> Self {
        self.children = children;
        self
    }

    pub fn canonical_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.caption)
    }

    /// Whether a deferred-only enumeration includes this node.
    pub fn is_deferred_root(&self) -> bool {
        self.root && self.deferred == Some(true) && !self.faults.deferred_read
    }
}

/// Serializable picture of a solution as seen by the host.
/// 主機所見方案狀態的可序列化快照。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolutionSnapshot {
    /// Solution file name; lookups fail when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(default)]
    pub load_deferred: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failing_enumerations: Vec<EnumerationFilter>,
    #[serde(default)]
    pub nodes: Vec<SnapshotNode>,
}

fn default_open() -> bool {
    true
}

impl SolutionSnapshot {
    pub fn new(solution: impl Into<String>) -> Self {
        Self {
            solution: Some(solution.into()),
            open: true,
            load_deferred: false,
            failing_enumerations: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<SnapshotNode>) -> Self {
        self.nodes = nodes;
        self
    }

    /// All nodes in pre-order with the handle each one is addressed by.
    pub fn flatten(&self) -> Vec<(NodeHandle, &SnapshotNode)> {
        let mut out = Vec::new();
        for node in &self.nodes {
            flatten_recursive(node, &mut out);
        }
        out
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SnapshotNode> {
        let mut remaining = position(handle)?;
        self.nodes
            .iter()
            .find_map(|node| find_recursive(node, &mut remaining))
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut SnapshotNode> {
        let mut remaining = position(handle)?;
        self.nodes
            .iter_mut()
            .find_map(|node| find_recursive_mut(node, &mut remaining))
    }
}

fn position(handle: NodeHandle) -> Option<u64> {
    handle.as_u64().checked_sub(1)
}

fn flatten_recursive<'a>(node: &'a SnapshotNode, out: &mut Vec<(NodeHandle, &'a SnapshotNode)>) {
    out.push((NodeHandle::new(out.len() as u64 + 1), node));
    for child in &node.children {
        flatten_recursive(child, out);
    }
}

fn find_recursive<'a>(node: &'a SnapshotNode, remaining: &mut u64) -> Option<&'a SnapshotNode> {
    if *remaining == 0 {
        return Some(node);
    }
    *remaining -= 1;
    node.children
        .iter()
        .find_map(|child| find_recursive(child, remaining))
}

fn find_recursive_mut<'a>(
    node: &'a mut SnapshotNode,
    remaining: &mut u64,
) -> Option<&'a mut SnapshotNode> {
    if *remaining == 0 {
        return Some(node);
    }
    *remaining -= 1;
    node.children
        .iter_mut()
        .find_map(|child| find_recursive_mut(child, remaining))
}
