//! Capabilities the host environment injects into the scanner.
//! 主機環境注入掃描器的能力介面。
//!
//! Every call returns a [`HostResult`] instead of a boxed property value; the
//! host owns all nodes, so caption writes go through `&self` and the host is
//! expected to use interior mutability.

use crate::error::HostResult;
use crate::node::{EnumerationFilter, NodeHandle, NodeKind, WorkspaceNode};

/// Cursor over a host enumeration, fetched in batches.
/// 以批次方式取得節點的列舉游標。
pub trait NodeCursor {
    /// Appends at most `max` nodes to `batch` and returns how many were appended.
    /// Returning `Ok(0)` signals the end of the enumeration.
    fn next_batch(&mut self, max: usize, batch: &mut Vec<WorkspaceNode>) -> HostResult<usize>;
}

/// Solution-level services and typed per-node property access.
/// 方案層級服務與節點屬性的型別化存取。
pub trait SolutionHost {
    /// Opens an enumeration over the nodes selected by `filter`.
    fn enumerate(&self, filter: EnumerationFilter) -> HostResult<Box<dyn NodeCursor + '_>>;

    fn caption(&self, node: NodeHandle) -> HostResult<String>;

    fn set_caption(&self, node: NodeHandle, caption: &str) -> HostResult<()>;

    /// `Err(HostError::Unresolved)` while the host has not materialized the node yet.
    fn is_deferred(&self, node: NodeHandle) -> HostResult<bool>;

    fn kind(&self, node: NodeHandle) -> HostResult<NodeKind>;

    fn canonical_name(&self, node: NodeHandle) -> HostResult<String>;

    fn solution_file_name(&self) -> HostResult<String>;

    fn is_solution_open(&self) -> HostResult<bool>;

    /// Whether the solution was opened with lightweight (deferred) loading.
    fn is_solution_load_deferred(&self) -> bool;
}

/// Append-only text stream backing a pane of the host's output window.
/// 主機輸出視窗中某個窗格的附加式文字串流。
pub trait OutputSink {
    /// Brings the pane to the front. Hosts without such a notion can ignore it.
    fn activate(&self) {}

    fn write_line(&self, text: &str) -> HostResult<()>;
}

/// Hands out output panes by caption.
pub trait OutputWindow {
    fn acquire_pane(&self, caption: &str) -> HostResult<Box<dyn OutputSink>>;
}

impl<T: SolutionHost + ?Sized> SolutionHost for &T {
    fn enumerate(&self, filter: EnumerationFilter) -> HostResult<Box<dyn NodeCursor + '_>> {
        (**self).enumerate(filter)
    }

    fn caption(&self, node: NodeHandle) -> HostResult<String> {
        (**self).caption(node)
    }

    fn set_caption(&self, node: NodeHandle, caption: &str) -> HostResult<()> {
        (**self).set_caption(node, caption)
    }

    fn is_deferred(&self, node: NodeHandle) -> HostResult<bool> {
        (**self).is_deferred(node)
    }

    fn kind(&self, node: NodeHandle) -> HostResult<NodeKind> {
        (**self).kind(node)
    }

    fn canonical_name(&self, node: NodeHandle) -> HostResult<String> {
        (**self).canonical_name(node)
    }

    fn solution_file_name(&self) -> HostResult<String> {
        (**self).solution_file_name()
    }

    fn is_solution_open(&self) -> HostResult<bool> {
        (**self).is_solution_open()
    }

    fn is_solution_load_deferred(&self) -> bool {
        (**self).is_solution_load_deferred()
    }
}

impl<T: OutputWindow + ?Sized> OutputWindow for &T {
    fn acquire_pane(&self, caption: &str) -> HostResult<Box<dyn OutputSink>> {
        (**self).acquire_pane(caption)
    }
}
