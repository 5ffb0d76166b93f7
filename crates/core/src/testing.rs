//! In-crate host double used by the unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{HostError, HostResult};
use crate::host::{NodeCursor, OutputSink, OutputWindow, SolutionHost};
use crate::node::{EnumerationFilter, NodeHandle, NodeKind, WorkspaceNode};

#[derive(Debug, Clone)]
pub(crate) struct FakeNode {
    pub is_root: bool,
    pub kind: HostResult<NodeKind>,
    pub deferred: HostResult<bool>,
    pub caption: String,
    pub caption_readable: bool,
    pub caption_writable: bool,
    pub name: HostResult<String>,
}

impl FakeNode {
    pub fn project(name: &str) -> Self {
        Self {
            is_root: true,
            kind: Ok(NodeKind::Project),
            deferred: Ok(false),
            caption: name.to_string(),
            caption_readable: true,
            caption_writable: true,
            name: Ok(format!("{name}.csproj")),
        }
    }

    pub fn deferred(name: &str) -> Self {
        Self {
            deferred: Ok(true),
            ..Self::project(name)
        }
    }

    pub fn folder(name: &str) -> Self {
        Self {
            kind: Ok(NodeKind::VirtualFolder),
            ..Self::project(name)
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeHost {
    pub nodes: RefCell<Vec<FakeNode>>,
    pub failing_filters: Vec<EnumerationFilter>,
    pub fail_after: Option<usize>,
    pub solution_name: Option<String>,
    pub open: bool,
    pub load_deferred: bool,
    pub batch_sizes: RefCell<Vec<usize>>,
}

impl FakeHost {
    pub fn with_nodes(nodes: Vec<FakeNode>) -> Self {
        Self {
            nodes: RefCell::new(nodes),
            solution_name: Some("Demo.sln".to_string()),
            open: true,
            ..Self::default()
        }
    }

    pub fn caption_of(&self, index: usize) -> String {
        self.nodes.borrow()[index].caption.clone()
    }

    fn with_node<T>(
        &self,
        node: NodeHandle,
        op: impl FnOnce(&mut FakeNode) -> HostResult<T>,
    ) -> HostResult<T> {
        let mut nodes = self.nodes.borrow_mut();
        let index = (node.as_u64() as usize)
            .checked_sub(1)
            .ok_or(HostError::UnknownNode(node))?;
        let entry = nodes.get_mut(index).ok_or(HostError::UnknownNode(node))?;
        op(entry)
    }
}

pub(crate) fn handle(index: usize) -> NodeHandle {
    NodeHandle::new(index as u64 + 1)
}

struct FakeCursor<'a> {
    nodes: Vec<WorkspaceNode>,
    position: usize,
    fail_after: Option<usize>,
    batch_sizes: &'a RefCell<Vec<usize>>,
}

impl NodeCursor for FakeCursor<'_> {
    fn next_batch(&mut self, max: usize, batch: &mut Vec<WorkspaceNode>) -> HostResult<usize> {
        self.batch_sizes.borrow_mut().push(max);
        if self.fail_after.is_some_and(|limit| self.position >= limit) {
            return Err(HostError::Status(-1));
        }
        let end = self.position.saturating_add(max).min(self.nodes.len());
        batch.extend_from_slice(&self.nodes[self.position..end]);
        let fetched = end - self.position;
        self.position = end;
        Ok(fetched)
    }
}

impl SolutionHost for FakeHost {
    fn enumerate(&self, filter: EnumerationFilter) -> HostResult<Box<dyn NodeCursor + '_>> {
        if self.failing_filters.contains(&filter) {
            return Err(HostError::Status(-2147467259));
        }
        let nodes = self
            .nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, node)| match filter {
                EnumerationFilter::DeferredOnly => node.is_root && node.deferred == Ok(true),
                _ => true,
            })
            .map(|(index, node)| WorkspaceNode {
                handle: handle(index),
                is_root: node.is_root,
            })
            .collect();
        Ok(Box::new(FakeCursor {
            nodes,
            position: 0,
            fail_after: self.fail_after,
            batch_sizes: &self.batch_sizes,
        }))
    }

    fn caption(&self, node: NodeHandle) -> HostResult<String> {
        self.with_node(node, |entry| {
            if entry.caption_readable {
                Ok(entry.caption.clone())
            } else {
                Err(HostError::Status(-1))
            }
        })
    }

    fn set_caption(&self, node: NodeHandle, caption: &str) -> HostResult<()> {
        self.with_node(node, |entry| {
            if entry.caption_writable {
                entry.caption = caption.to_string();
                Ok(())
            } else {
                Err(HostError::Status(-1))
            }
        })
    }

    fn is_deferred(&self, node: NodeHandle) -> HostResult<bool> {
        self.with_node(node, |entry| entry.deferred.clone())
    }

    fn kind(&self, node: NodeHandle) -> HostResult<NodeKind> {
        self.with_node(node, |entry| entry.kind.clone())
    }

    fn canonical_name(&self, node: NodeHandle) -> HostResult<String> {
        self.with_node(node, |entry| entry.name.clone())
    }

    fn solution_file_name(&self) -> HostResult<String> {
        self.solution_name.clone().ok_or(HostError::Status(-1))
    }

    fn is_solution_open(&self) -> HostResult<bool> {
        Ok(self.open)
    }

    fn is_solution_load_deferred(&self) -> bool {
        self.load_deferred
    }
}

/// Output window recording every line and how often a pane was acquired.
#[derive(Debug, Default, Clone)]
pub(crate) struct RecordingWindow {
    pub lines: Rc<RefCell<Vec<String>>>,
    pub acquisitions: Rc<Cell<usize>>,
    pub activations: Rc<Cell<usize>>,
    pub failures_left: Rc<Cell<usize>>,
}

struct RecordingPane {
    lines: Rc<RefCell<Vec<String>>>,
    activations: Rc<Cell<usize>>,
}

impl OutputSink for RecordingPane {
    fn activate(&self) {
        self.activations.set(self.activations.get() + 1);
    }

    fn write_line(&self, text: &str) -> HostResult<()> {
        self.lines.borrow_mut().push(text.to_string());
        Ok(())
    }
}

impl OutputWindow for RecordingWindow {
    fn acquire_pane(&self, caption: &str) -> HostResult<Box<dyn OutputSink>> {
        self.acquisitions.set(self.acquisitions.get() + 1);
        if self.failures_left.get() > 0 {
            self.failures_left.set(self.failures_left.get() - 1);
            return Err(HostError::PaneUnavailable(caption.to_string()));
        }
        Ok(Box::new(RecordingPane {
            lines: Rc::clone(&self.lines),
            activations: Rc::clone(&self.activations),
        }))
    }
}

impl RecordingWindow {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}
