use std::cell::{Ref, RefCell};

use lsldetails_core::{
    EnumerationFilter, HostError, HostResult, NodeCursor, NodeHandle, NodeKind, SolutionHost,
    WorkspaceNode,
};
use tracing::trace;

use crate::snapshot::{SnapshotNode, SolutionSnapshot};

/// Status returned for injected faults (`E_FAIL`).
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

/// [`SolutionHost`] backed by a [`SolutionSnapshot`]. Caption writes mutate
/// the snapshot in place so it can be saved afterwards.
/// 以快照實作的主機；標題寫入會直接修改快照，之後可再儲存。
#[derive(Debug)]
pub struct SnapshotHost {
    snapshot: RefCell<SolutionSnapshot>,
}

impl SnapshotHost {
    pub fn new(snapshot: SolutionSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Ref<'_, SolutionSnapshot> {
        self.snapshot.borrow()
    }

    pub fn into_snapshot(self) -> SolutionSnapshot {
        self.snapshot.into_inner()
    }

    /// Replaces the observed state, e.g. after the host finished loading a project.
    pub fn replace(&self, snapshot: SolutionSnapshot) {
        *self.snapshot.borrow_mut() = snapshot;
    }

    fn read<T>(
        &self,
        handle: NodeHandle,
        op: impl FnOnce(&SnapshotNode) -> HostResult<T>,
    ) -> HostResult<T> {
        let snapshot = self.snapshot.borrow();
        let node = snapshot.node(handle).ok_or(HostError::UnknownNode(handle))?;
        op(node)
    }
}

/// Cursor over the nodes selected when the enumeration was opened.
struct SnapshotCursor {
    nodes: std::vec::IntoIter<WorkspaceNode>,
}

impl NodeCursor for SnapshotCursor {
    fn next_batch(&mut self, max: usize, batch: &mut Vec<WorkspaceNode>) -> HostResult<usize> {
        let before = batch.len();
        batch.extend(self.nodes.by_ref().take(max));
        Ok(batch.len() - before)
    }
}

fn selected(filter: EnumerationFilter, node: &SnapshotNode) -> bool {
    match filter {
        EnumerationFilter::AllProjects | EnumerationFilter::LoadedInSolution => true,
        EnumerationFilter::DeferredOnly => node.is_deferred_root(),
    }
}

fn fail_if(fault: bool) -> HostResult<()> {
    if fault {
        Err(HostError::Status(E_FAIL))
    } else {
        Ok(())
    }
}

impl SolutionHost for SnapshotHost {
    fn enumerate(&self, filter: EnumerationFilter) -> HostResult<Box<dyn NodeCursor + '_>> {
        let snapshot = self.snapshot.borrow();
        fail_if(snapshot.failing_enumerations.contains(&filter))?;
        let nodes: Vec<_> = snapshot
            .flatten()
            .into_iter()
            .filter(|(_, node)| selected(filter, node))
            .map(|(handle, node)| WorkspaceNode {
                handle,
                is_root: node.root,
            })
            .collect();
        trace!(%filter, count = nodes.len(), "enumeration opened");
        Ok(Box::new(SnapshotCursor {
            nodes: nodes.into_iter(),
        }))
    }

    fn caption(&self, node: NodeHandle) -> HostResult<String> {
        self.read(node, |entry| {
            fail_if(entry.faults.caption_read)?;
            Ok(entry.caption.clone())
        })
    }

    fn set_caption(&self, node: NodeHandle, caption: &str) -> HostResult<()> {
        let mut snapshot = self.snapshot.borrow_mut();
        let entry = snapshot.node_mut(node).ok_or(HostError::UnknownNode(node))?;
        fail_if(entry.faults.caption_write)?;
        // the canonical name must not follow caption edits
        if entry.name.is_none() {
            entry.name = Some(entry.caption.clone());
        }
        entry.caption = caption.to_string();
        Ok(())
    }

    fn is_deferred(&self, node: NodeHandle) -> HostResult<bool> {
        self.read(node, |entry| {
            fail_if(entry.faults.deferred_read)?;
            entry.deferred.ok_or(HostError::Unresolved)
        })
    }

    fn kind(&self, node: NodeHandle) -> HostResult<NodeKind> {
        self.read(node, |entry| {
            fail_if(entry.faults.kind_read)?;
            Ok(entry.kind)
        })
    }

    fn canonical_name(&self, node: NodeHandle) -> HostResult<String> {
        self.read(node, |entry| {
            fail_if(entry.faults.name_read)?;
            Ok(entry.canonical_name().to_string())
        })
    }

    fn solution_file_name(&self) -> HostResult<String> {
        self.snapshot
            .borrow()
            .solution
            .clone()
            .ok_or(HostError::Status(E_FAIL))
    }

    fn is_solution_open(&self) -> HostResult<bool> {
        Ok(self.snapshot.borrow().open)
    }

    fn is_solution_load_deferred(&self) -> bool {
        self.snapshot.borrow().load_deferred
    }
}
