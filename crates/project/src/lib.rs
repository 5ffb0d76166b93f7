//! Snapshot-backed solution host for LslDetails.
//! 以 JSON 快照模擬主機方案樹的模組。

mod host;
mod output;
mod snapshot;
mod store;

pub use host::{SnapshotHost, E_FAIL};
pub use output::MemoryOutput;
pub use snapshot::{NodeFaults, SnapshotNode, SolutionSnapshot};
pub use store::{SnapshotStore, SnapshotStoreError};
