//! Deferred-project scanner for lightweight solution loads.
//! 輕量化方案載入的延遲專案掃描核心。
//!
//! The host environment is injected through the traits in [`host`]; the
//! scanner walks the solution tree, marks deferred projects and writes a
//! summary to an output pane.

mod annotator;
mod classifier;
mod error;
mod monitor;
mod output;
mod report;
mod walker;

pub mod host;
pub mod node;

#[cfg(test)]
mod testing;

pub use annotator::{CaptionAnnotator, DEFAULT_MARKER_SUFFIX};
pub use classifier::{ClassificationResult, Placement, ProjectClassifier};
pub use error::{HostError, HostResult, ScanError};
pub use host::{NodeCursor, OutputSink, OutputWindow, SolutionHost};
pub use monitor::{CycleOutcome, CycleState, DeferredLoadMonitor, ScanOptions};
pub use node::{EnumerationFilter, NodeHandle, NodeKind, NodeProperty, WorkspaceNode};
pub use output::{OutputPane, DEFAULT_PANE_CAPTION};
pub use report::{BucketSummary, SolutionSummary, SummaryReporter};
pub use walker::{HierarchyWalk, HierarchyWalker, DEFAULT_BATCH_SIZE};
