use thiserror::Error;

use crate::node::{EnumerationFilter, NodeHandle, NodeProperty};

/// Failures reported by the host environment for a single call.
/// 主機環境單次呼叫回報的錯誤。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("host call failed with status {0:#010x}")]
    Status(i32),
    #[error("property is not resolvable yet")]
    Unresolved,
    #[error("node {0} is not known to the host")]
    UnknownNode(NodeHandle),
    #[error("output pane '{0}' is unavailable")]
    PaneUnavailable(String),
}

/// Result type returned by host capability calls.
pub type HostResult<T> = Result<T, HostError>;

/// Degradations observed during a scan. None of them aborts a cycle; they are
/// logged and the affected datum is skipped.
/// 掃描過程中的降級狀況；不會中止流程，只會略過受影響的資料。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("enumeration of {filter} nodes failed: {source}")]
    EnumerationFailed {
        filter: EnumerationFilter,
        #[source]
        source: HostError,
    },
    #[error("failed to read {property} of node {node}: {source}")]
    PropertyReadFailed {
        node: NodeHandle,
        property: NodeProperty,
        #[source]
        source: HostError,
    },
    #[error("failed to write {property} of node {node}: {source}")]
    PropertyWriteFailed {
        node: NodeHandle,
        property: NodeProperty,
        #[source]
        source: HostError,
    },
    #[error("failed to resolve canonical name of node {node}: {source}")]
    NameLookupFailed {
        node: NodeHandle,
        #[source]
        source: HostError,
    },
}

impl ScanError {
    pub fn is_enumeration_failure(&self) -> bool {
        matches!(self, ScanError::EnumerationFailed { .. })
    }
}
