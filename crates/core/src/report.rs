//! Summary of one classification pass, rendered as report lines.
//! 單次分類結果的摘要與文字報告。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::ClassificationResult;
use crate::error::ScanError;
use crate::host::SolutionHost;
use crate::node::WorkspaceNode;

/// Counts and resolved canonical names of one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    /// Number of classified nodes, including those whose name lookup failed.
    pub count: usize,
    pub names: Vec<String>,
}

/// Structured form of the report, suitable for JSON output.
/// 報告的結構化形式，可輸出為 JSON。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub solution: String,
    pub total: usize,
    pub deferred: BucketSummary,
    pub non_deferred: BucketSummary,
}

impl SolutionSummary {
    /// Renders the human-readable report, one entry per output line.
    pub fn lines(&self) -> Vec<String> {
        let capacity = 3 + self.deferred.names.len() + self.non_deferred.names.len();
        let mut lines = Vec::with_capacity(capacity);
        lines.push(format!(
            "Solution '{}' has {} projects.",
            self.solution, self.total
        ));
        lines.push(format!("* Deferred projects - {}", self.deferred.count));
        lines.extend(self.deferred.names.iter().cloned());
        lines.push(format!("* Non deferred projects - {}", self.non_deferred.count));
        lines.extend(self.non_deferred.names.iter().cloned());
        lines
    }
}

/// Resolves canonical names and formats classification results.
#[derive(Debug)]
pub struct SummaryReporter<'h, H: SolutionHost + ?Sized> {
    host: &'h H,
}

impl<'h, H: SolutionHost + ?Sized> SummaryReporter<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    pub fn summarize(&self, result: &ClassificationResult, solution_label: &str) -> SolutionSummary {
        SolutionSummary {
            solution: solution_label.to_string(),
            total: result.total(),
            deferred: self.bucket(&result.deferred),
            non_deferred: self.bucket(&result.non_deferred),
        }
    }

    pub fn format(&self, result: &ClassificationResult, solution_label: &str) -> Vec<String> {
        self.summarize(result, solution_label).lines()
    }

    fn bucket(&self, nodes: &[WorkspaceNode]) -> BucketSummary {
        let names = nodes
            .iter()
            .filter_map(|node| match self.host.canonical_name(node.handle) {
                Ok(name) => Some(name),
                Err(source) => {
                    let err = ScanError::NameLookupFailed {
                        node: node.handle,
                        source,
                    };
                    debug!(error = %err, "omitting report line");
                    None
                }
            })
            .collect();
        BucketSummary {
            count: nodes.len(),
            names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::testing::{handle, FakeHost, FakeNode};

    #[test]
    fn formats_header_sections_and_names() {
        let host =
            FakeHost::with_nodes(vec![FakeNode::deferred("Alpha"), FakeNode::project("Beta")]);
        let result = ClassificationResult {
            deferred: vec![WorkspaceNode::root(handle(0))],
            non_deferred: vec![WorkspaceNode::root(handle(1))],
            ..ClassificationResult::default()
        };

        let lines = SummaryReporter::new(&host).format(&result, "Demo.sln");
        assert_eq!(
            lines,
            vec![
                "Solution 'Demo.sln' has 2 projects.",
                "* Deferred projects - 1",
                "Alpha.csproj",
                "* Non deferred projects - 1",
                "Beta.csproj",
            ]
        );
    }

    #[test]
    fn failed_name_lookup_omits_line_but_keeps_count() {
        let mut nameless = FakeNode::project("Ghost");
        nameless.name = Err(HostError::Status(-1));
        let host = FakeHost::with_nodes(vec![nameless, FakeNode::project("Beta")]);
        let result = ClassificationResult {
            non_deferred: vec![WorkspaceNode::root(handle(0)), WorkspaceNode::root(handle(1))],
            ..ClassificationResult::default()
        };

        let summary = SummaryReporter::new(&host).summarize(&result, "Demo.sln");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.non_deferred.count, 2);
        assert_eq!(summary.non_deferred.names, vec!["Beta.csproj"]);
        assert_eq!(summary.lines().len(), 4);
    }

    #[test]
    fn empty_result_reports_zero_everywhere() {
        let host = FakeHost::with_nodes(Vec::new());
        let lines = SummaryReporter::new(&host).format(&ClassificationResult::default(), "");
        assert_eq!(
            lines,
            vec![
                "Solution '' has 0 projects.",
                "* Deferred projects - 0",
                "* Non deferred projects - 0",
            ]
        );
    }

    #[test]
    fn summary_serializes_to_json() {
        let summary = SolutionSummary {
            solution: "Demo.sln".into(),
            total: 1,
            deferred: BucketSummary {
                count: 1,
                names: vec!["Alpha.csproj".into()],
            },
            non_deferred: BucketSummary::default(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["deferred"]["names"][0], "Alpha.csproj");
        assert_eq!(value["non_deferred"]["count"], 0);
    }
}
