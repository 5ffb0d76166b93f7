use tracing::debug;

use crate::error::{HostError, ScanError};
use crate::host::SolutionHost;
use crate::node::{NodeKind, NodeProperty, WorkspaceNode};

/// Outcome of one classification pass. Built fresh for every pass.
/// 單次分類的結果；每次掃描都重新建立。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub deferred: Vec<WorkspaceNode>,
    pub non_deferred: Vec<WorkspaceNode>,
    /// Roots whose type tag could not be read.
    pub dropped: usize,
    /// Nested (non-root) nodes that were not classified.
    pub nested: usize,
    /// Set when the enumeration feeding this pass could not be opened.
    pub enumeration_failed: bool,
}

impl ClassificationResult {
    pub fn total(&self) -> usize {
        self.deferred.len() + self.non_deferred.len()
    }
}

/// Where a single root node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Deferred,
    NonDeferred,
    VirtualFolder,
    Dropped,
}

/// Splits root nodes into deferred and non-deferred projects.
#[derive(Debug)]
pub struct ProjectClassifier<'h, H: SolutionHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: SolutionHost + ?Sized> ProjectClassifier<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    pub fn classify<I>(&self, nodes: I) -> ClassificationResult
    where
        I: IntoIterator<Item = WorkspaceNode>,
    {
        let mut result = ClassificationResult::default();
        for node in nodes {
            if !node.is_root {
                result.nested += 1;
                continue;
            }
            match self.place(node) {
                Placement::Deferred => result.deferred.push(node),
                Placement::NonDeferred => result.non_deferred.push(node),
                Placement::VirtualFolder => {}
                Placement::Dropped => result.dropped += 1,
            }
        }
        result
    }

    /// Decides the bucket of one root node. A deferred flag that cannot be
    /// read counts as "not proven deferred"; a type tag that cannot be read
    /// drops the node.
    pub fn place(&self, node: WorkspaceNode) -> Placement {
        match self.host.is_deferred(node.handle) {
            Ok(true) => return Placement::Deferred,
            Ok(false) | Err(HostError::Unresolved) => {}
            Err(source) => {
                let err = ScanError::PropertyReadFailed {
                    node: node.handle,
                    property: NodeProperty::IsDeferred,
                    source,
                };
                debug!(error = %err, "treating node as not deferred");
            }
        }

        match self.host.kind(node.handle) {
            Ok(NodeKind::VirtualFolder) => Placement::VirtualFolder,
            Ok(_) => Placement::NonDeferred,
            Err(source) => {
                let err = ScanError::PropertyReadFailed {
                    node: node.handle,
                    property: NodeProperty::TypeTag,
                    source,
                };
                debug!(error = %err, "dropping node");
                Placement::Dropped
            }
        }
    }
}
