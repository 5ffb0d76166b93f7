use std::collections::VecDeque;
use std::iter::FusedIterator;

use tracing::{debug, warn};

use crate::error::{HostError, ScanError};
use crate::host::{NodeCursor, SolutionHost};
use crate::node::{EnumerationFilter, WorkspaceNode};

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Enumerates solution nodes through the host's batched cursor protocol.
/// 透過主機的批次游標協定列舉方案節點。
#[derive(Debug)]
pub struct HierarchyWalker<'h, H: SolutionHost + ?Sized> {
    host: &'h H,
    batch_size: usize,
}

impl<'h, H: SolutionHost + ?Sized> HierarchyWalker<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_batch_size(host, DEFAULT_BATCH_SIZE)
    }

    /// A zero batch size is bumped to one.
    pub fn with_batch_size(host: &'h H, batch_size: usize) -> Self {
        Self {
            host,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Opens a walk, surfacing a failed initial request as
    /// [`ScanError::EnumerationFailed`].
    pub fn try_enumerate(&self, filter: EnumerationFilter) -> Result<HierarchyWalk<'h>, ScanError> {
        match self.host.enumerate(filter) {
            Ok(cursor) => Ok(HierarchyWalk {
                filter,
                batch_size: self.batch_size,
                cursor: Some(cursor),
                pending: VecDeque::new(),
                scratch: Vec::new(),
                interrupted: None,
                opening_error: None,
            }),
            Err(source) => Err(ScanError::EnumerationFailed { filter, source }),
        }
    }

    /// Opens a walk, degrading a failed initial request to an empty walk.
    /// The failure stays observable through [`HierarchyWalk::opening_error`].
    pub fn enumerate(&self, filter: EnumerationFilter) -> HierarchyWalk<'h> {
        self.try_enumerate(filter).unwrap_or_else(|err| {
            warn!(%filter, error = %err, "enumeration failed; treating as empty");
            HierarchyWalk::failed(filter, err)
        })
    }
}

/// Single-pass, host-ordered sequence of nodes produced by one enumeration.
/// 單次、依主機順序產生的節點序列；不可重新開始。
pub struct HierarchyWalk<'h> {
    filter: EnumerationFilter,
    batch_size: usize,
    cursor: Option<Box<dyn NodeCursor + 'h>>,
    pending: VecDeque<WorkspaceNode>,
    scratch: Vec<WorkspaceNode>,
    interrupted: Option<HostError>,
    opening_error: Option<ScanError>,
}

impl<'h> HierarchyWalk<'h> {
    fn failed(filter: EnumerationFilter, error: ScanError) -> Self {
        Self {
            filter,
            batch_size: DEFAULT_BATCH_SIZE,
            cursor: None,
            pending: VecDeque::new(),
            scratch: Vec::new(),
            interrupted: None,
            opening_error: Some(error),
        }
    }

    /// The error that prevented the walk from starting, if any.
    pub fn opening_error(&self) -> Option<&ScanError> {
        self.opening_error.as_ref()
    }

    /// The host failure that ended the walk after it had started, if any.
    pub fn interrupted_by(&self) -> Option<&HostError> {
        self.interrupted.as_ref()
    }

    fn fetch(&mut self) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        self.scratch.clear();
        match cursor.next_batch(self.batch_size, &mut self.scratch) {
            Ok(fetched) if fetched > 0 && !self.scratch.is_empty() => {
                self.pending.extend(self.scratch.drain(..));
            }
            Ok(_) => {
                self.cursor = None;
            }
            Err(err) => {
                debug!(filter = %self.filter, error = %err, "enumeration stopped early");
                self.interrupted = Some(err);
                self.cursor = None;
            }
        }
    }
}

impl Iterator for HierarchyWalk<'_> {
    type Item = WorkspaceNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_empty() {
            self.fetch();
        }
        self.pending.pop_front()
    }
}

impl FusedIterator for HierarchyWalk<'_> {}
