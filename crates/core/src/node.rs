use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a node in the host's solution tree, stable for one host session.
/// 方案樹節點的不透明識別碼，在同一個主機工作階段內保持穩定。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Type tag reported by the host for a hierarchy root.
/// 主機回報的節點類型標記。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Project,
    VirtualFolder,
    Other,
}

impl NodeKind {
    pub fn is_virtual_folder(&self) -> bool {
        matches!(self, NodeKind::VirtualFolder)
    }
}

/// Selects which subset of the solution tree a walk visits.
/// 決定列舉時要走訪的節點子集。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationFilter {
    AllProjects,
    DeferredOnly,
    LoadedInSolution,
}

impl fmt::Display for EnumerationFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnumerationFilter::AllProjects => "all-projects",
            EnumerationFilter::DeferredOnly => "deferred-only",
            EnumerationFilter::LoadedInSolution => "loaded-in-solution",
        };
        f.write_str(label)
    }
}

/// A node as handed out by an enumeration: its handle plus whether it is the
/// root of a project hierarchy (only roots are classified).
/// 列舉結果中的節點：識別碼與是否為專案階層根節點。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkspaceNode {
    pub handle: NodeHandle,
    pub is_root: bool,
}

impl WorkspaceNode {
    pub fn root(handle: NodeHandle) -> Self {
        Self {
            handle,
            is_root: true,
        }
    }

    pub fn nested(handle: NodeHandle) -> Self {
        Self {
            handle,
            is_root: false,
        }
    }
}

/// Per-node properties the core reads or writes through the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeProperty {
    Caption,
    IsDeferred,
    TypeTag,
}

impl fmt::Display for NodeProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NodeProperty::Caption => "caption",
            NodeProperty::IsDeferred => "is-deferred",
            NodeProperty::TypeTag => "type-tag",
        };
        f.write_str(label)
    }
}
