//! Drives the annotate → classify → report cycle on workspace activation.
//! 在工作區完全載入時執行「標記 → 分類 → 報告」流程。

use std::fmt;

use tracing::{debug, info, warn};

use crate::annotator::{CaptionAnnotator, DEFAULT_MARKER_SUFFIX};
use crate::classifier::{ClassificationResult, ProjectClassifier};
use crate::host::{OutputWindow, SolutionHost};
use crate::node::EnumerationFilter;
use crate::output::{OutputPane, DEFAULT_PANE_CAPTION};
use crate::report::{SolutionSummary, SummaryReporter};
use crate::walker::{HierarchyWalker, DEFAULT_BATCH_SIZE};

/// Tunables for one monitor, usually derived from the saved preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub marker_suffix: String,
    pub skip_already_marked: bool,
    pub batch_size: usize,
    pub pane_caption: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            marker_suffix: DEFAULT_MARKER_SUFFIX.to_string(),
            skip_already_marked: true,
            batch_size: DEFAULT_BATCH_SIZE,
            pane_caption: DEFAULT_PANE_CAPTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Annotating,
    Classifying,
    Reporting,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleState::Idle => "idle",
            CycleState::Annotating => "annotating",
            CycleState::Classifying => "classifying",
            CycleState::Reporting => "reporting",
        };
        f.write_str(label)
    }
}

/// What one completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    pub annotated: usize,
    pub classification: ClassificationResult,
    pub summary: SolutionSummary,
    pub lines_written: usize,
}

/// Owns the injected host services and runs a cycle each time the workspace
/// becomes fully active.
/// 持有注入的主機服務，並在工作區每次完全載入時執行一輪流程。
pub struct DeferredLoadMonitor<H: SolutionHost, W: OutputWindow> {
    host: H,
    output: OutputPane<W>,
    options: ScanOptions,
    state: CycleState,
    completed_cycles: usize,
}

impl<H: SolutionHost, W: OutputWindow> DeferredLoadMonitor<H, W> {
    pub fn new(host: H, window: W, options: ScanOptions) -> Self {
        let output = OutputPane::new(window, options.pane_caption.clone());
        Self {
            host,
            output,
            options,
            state: CycleState::Idle,
            completed_cycles: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn completed_cycles(&self) -> usize {
        self.completed_cycles
    }

    /// Adapts a raw load-context notification; deactivation is ignored.
    pub fn on_context_changed(&mut self, activated: bool) -> Option<CycleOutcome> {
        if activated {
            Some(self.on_workspace_became_active())
        } else {
            debug!("workspace left the fully loaded state");
            None
        }
    }

    pub fn on_workspace_became_active(&mut self) -> CycleOutcome {
        self.transition(CycleState::Annotating);
        let annotated = self.annotate();

        self.transition(CycleState::Classifying);
        let classification = self.classify(EnumerationFilter::LoadedInSolution);

        self.transition(CycleState::Reporting);
        let (summary, lines_written) = self.report(&classification);

        self.transition(CycleState::Idle);
        self.completed_cycles += 1;
        info!(
            cycle = self.completed_cycles,
            annotated,
            deferred = classification.deferred.len(),
            non_deferred = classification.non_deferred.len(),
            "deferred load cycle finished"
        );

        CycleOutcome {
            annotated,
            classification,
            summary,
            lines_written,
        }
    }

    /// On-demand report for the currently open solution. Never touches
    /// captions. Returns `None` when no solution is open.
    pub fn details_command(&self) -> Option<SolutionSummary> {
        match self.host.is_solution_open() {
            Ok(true) => {}
            Ok(false) => {
                info!("no solution is open; nothing to report");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "could not tell whether a solution is open");
                return None;
            }
        }

        let filter = if self.host.is_solution_load_deferred() {
            EnumerationFilter::AllProjects
        } else {
            EnumerationFilter::LoadedInSolution
        };
        let classification = self.classify(filter);
        let (summary, _) = self.report(&classification);
        Some(summary)
    }

    /// Runs the annotation step on its own.
    pub fn annotate(&self) -> usize {
        let walk = self.walker().enumerate(EnumerationFilter::DeferredOnly);
        CaptionAnnotator::new(&self.host)
            .with_marker(self.options.marker_suffix.clone())
            .skip_already_marked(self.options.skip_already_marked)
            .annotate_deferred(walk)
    }

    /// Runs one classification pass over the nodes selected by `filter`.
    pub fn classify(&self, filter: EnumerationFilter) -> ClassificationResult {
        let walk = self.walker().enumerate(filter);
        let enumeration_failed = walk.opening_error().is_some();
        let mut result = ProjectClassifier::new(&self.host).classify(walk);
        result.enumeration_failed = enumeration_failed;
        result
    }

    fn report(&self, classification: &ClassificationResult) -> (SolutionSummary, usize) {
        let label = self.host.solution_file_name().unwrap_or_else(|err| {
            warn!(error = %err, "solution file name unavailable");
            String::new()
        });
        let summary = SummaryReporter::new(&self.host).summarize(classification, &label);
        let written = self.output.write_all(summary.lines());
        (summary, written)
    }

    fn walker(&self) -> HierarchyWalker<'_, H> {
        HierarchyWalker::with_batch_size(&self.host, self.options.batch_size)
    }

    fn transition(&mut self, next: CycleState) {
        debug!(from = %self.state, to = %next, "cycle transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, FakeNode, RecordingWindow};

    fn scenario() -> FakeHost {
        FakeHost::with_nodes(vec![
            FakeNode::deferred("Alpha"),
            FakeNode::project("Beta"),
            FakeNode::folder("Solution Items"),
        ])
    }

    #[test]
    fn full_cycle_annotates_classifies_and_reports() {
        let host = scenario();
        let window = RecordingWindow::default();
        let mut monitor = DeferredLoadMonitor::new(&host, window.clone(), ScanOptions::default());

        let outcome = monitor.on_workspace_became_active();
        assert_eq!(outcome.annotated, 1);
        assert_eq!(host.caption_of(0), "Alpha*");
        assert_eq!(outcome.summary.total, 2);
        assert_eq!(outcome.lines_written, 5);
        assert_eq!(
            window.lines(),
            vec![
                "Solution 'Demo.sln' has 2 projects.",
                "* Deferred projects - 1",
                "Alpha.csproj",
                "* Non deferred projects - 1",
                "Beta.csproj",
            ]
        );
        assert_eq!(monitor.state(), CycleState::Idle);
        assert_eq!(monitor.completed_cycles(), 1);
    }

    #[test]
    fn repeated_cycles_produce_identical_reports() {
        let host = scenario();
        let window = RecordingWindow::default();
        let mut monitor = DeferredLoadMonitor::new(&host, window.clone(), ScanOptions::default());

        let first = monitor.on_workspace_became_active();
        let second = monitor.on_workspace_became_active();
        assert_eq!(first.summary.lines(), second.summary.lines());
        assert_eq!(second.annotated, 0);
        assert_eq!(host.caption_of(0), "Alpha*");
        assert_eq!(window.acquisitions.get(), 1);
    }

    #[test]
    fn deactivation_does_nothing() {
        let host = scenario();
        let mut monitor =
            DeferredLoadMonitor::new(&host, RecordingWindow::default(), ScanOptions::default());
        assert!(monitor.on_context_changed(false).is_none());
        assert_eq!(host.caption_of(0), "Alpha");
        assert!(monitor.on_context_changed(true).is_some());
    }

    #[test]
    fn failed_enumeration_reports_zero_without_side_effects() {
        let mut host = scenario();
        host.failing_filters = vec![
            EnumerationFilter::DeferredOnly,
            EnumerationFilter::LoadedInSolution,
        ];
        let window = RecordingWindow::default();
        let mut monitor = DeferredLoadMonitor::new(&host, window.clone(), ScanOptions::default());

        let outcome = monitor.on_workspace_became_active();
        assert_eq!(outcome.annotated, 0);
        assert!(outcome.classification.enumeration_failed);
        assert_eq!(host.caption_of(0), "Alpha");
        assert_eq!(window.lines()[0], "Solution 'Demo.sln' has 0 projects.");
        assert_eq!(window.lines()[1], "* Deferred projects - 0");
    }

    #[test]
    fn missing_solution_name_leaves_label_empty() {
        let mut host = scenario();
        host.solution_name = None;
        let window = RecordingWindow::default();
        let mut monitor = DeferredLoadMonitor::new(&host, window.clone(), ScanOptions::default());
        monitor.on_workspace_became_active();
        assert_eq!(window.lines()[0], "Solution '' has 2 projects.");
    }

    #[test]
    fn details_command_requires_an_open_solution() {
        let mut host = scenario();
        host.open = false;
        let window = RecordingWindow::default();
        let monitor = DeferredLoadMonitor::new(&host, window.clone(), ScanOptions::default());
        assert!(monitor.details_command().is_none());
        assert!(window.lines().is_empty());
    }

    #[test]
    fn details_command_uses_all_projects_for_deferred_loads() {
        let mut host = scenario();
        host.load_deferred = true;
        host.failing_filters = vec![EnumerationFilter::LoadedInSolution];
        let monitor =
            DeferredLoadMonitor::new(&host, RecordingWindow::default(), ScanOptions::default());

        let summary = monitor.details_command().expect("solution is open");
        assert_eq!(summary.total, 2);
        assert_eq!(host.caption_of(0), "Alpha");
    }
}
