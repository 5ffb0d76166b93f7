use tracing::{debug, warn};

use crate::error::ScanError;
use crate::host::SolutionHost;
use crate::node::{NodeProperty, WorkspaceNode};

/// Marker appended to the caption of deferred projects.
pub const DEFAULT_MARKER_SUFFIX: &str = "*";

/// Appends a marker to the caption of deferred projects.
/// 為延遲載入的專案標題加上標記。
#[derive(Debug)]
pub struct CaptionAnnotator<'h, H: SolutionHost + ?Sized> {
    host: &'h H,
    marker: String,
    skip_already_marked: bool,
}

impl<'h, H: SolutionHost + ?Sized> CaptionAnnotator<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            marker: DEFAULT_MARKER_SUFFIX.to_string(),
            skip_already_marked: true,
        }
    }

    /// An empty marker falls back to [`DEFAULT_MARKER_SUFFIX`].
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if !marker.is_empty() {
            self.marker = marker;
        }
        self
    }

    /// When disabled, every call appends the marker again.
    pub fn skip_already_marked(mut self, skip: bool) -> Self {
        self.skip_already_marked = skip;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Annotates every node and returns how many captions were rewritten.
    pub fn annotate_deferred<I>(&self, nodes: I) -> usize
    where
        I: IntoIterator<Item = WorkspaceNode>,
    {
        nodes
            .into_iter()
            .filter(|node| self.annotate(*node))
            .count()
    }

    fn annotate(&self, node: WorkspaceNode) -> bool {
        let caption = match self.host.caption(node.handle) {
            Ok(caption) => caption,
            Err(source) => {
                let err = ScanError::PropertyReadFailed {
                    node: node.handle,
                    property: NodeProperty::Caption,
                    source,
                };
                debug!(error = %err, "skipping caption");
                return false;
            }
        };

        if self.skip_already_marked && caption.ends_with(&self.marker) {
            debug!(node = %node.handle, %caption, "caption already marked");
            return false;
        }

        let marked = format!("{caption}{}", self.marker);
        match self.host.set_caption(node.handle, &marked) {
            Ok(()) => true,
            Err(source) => {
                let err = ScanError::PropertyWriteFailed {
                    node: node.handle,
                    property: NodeProperty::Caption,
                    source,
                };
                warn!(error = %err, "caption left unchanged");
                false
            }
        }
    }
}
