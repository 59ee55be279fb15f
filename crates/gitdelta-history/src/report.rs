//! Machine-readable summary of a history graph.

use serde::Serialize;

use gitdelta_core::DeltaError;

use crate::edges::edges;
use crate::graph::{short_id, HistoryGraph};

/// Serializable view of a [`HistoryGraph`].
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::{parse_log_to_history, DeltaReport};
///
/// let graph = parse_log_to_history(
///     "commit bbbbbbbbbb aaaaaaaaaa\n\n    tip\n\ncommit aaaaaaaaaa\n",
///     &mut Diagnostics::default(),
/// ).unwrap();
/// let report = DeltaReport::from_graph(&graph);
/// assert_eq!(report.commit_count, 2);
/// assert_eq!(report.commits[0].subject, "tip");
/// assert_eq!(report.primary_path, vec!["bbbbbbbb", "aaaaaaaa"]);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaReport {
    /// Number of commits in the graph.
    pub commit_count: usize,
    /// Commits in graph order.
    pub commits: Vec<CommitEntry>,
    /// Short ids of commits without a resolved parent.
    pub roots: Vec<String>,
    /// Short ids along the first-parent chain from the entry commit.
    pub primary_path: Vec<String>,
    /// Edges in enumeration order, unresolved ones included.
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitEntry {
    pub id: String,
    pub short_id: String,
    pub author: String,
    pub date: String,
    /// First non-blank message line.
    pub subject: String,
    /// Short ids of the resolved parents, first parent first.
    pub parents: Vec<String>,
    /// Full ids of parents outside the graph.
    pub unresolved_parents: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEntry {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl DeltaReport {
    pub fn from_graph(graph: &HistoryGraph) -> Self {
        let commits = graph
            .commits()
            .iter()
            .map(|commit| CommitEntry {
                id: commit.id.clone(),
                short_id: commit.short_id.clone(),
                author: commit.author.clone(),
                date: commit.date.clone(),
                subject: commit.summary().to_string(),
                parents: graph
                    .parents_of(commit)
                    .map(|parent| parent.short_id.clone())
                    .collect(),
                unresolved_parents: commit.unresolved_parents().to_vec(),
            })
            .collect();

        let edges = edges(graph, true)
            .iter()
            .map(|edge| {
                let label = edge.label();
                let annotation = graph.annotation(&label).map(str::to_string);
                EdgeEntry { label, annotation }
            })
            .collect();

        Self {
            commit_count: graph.len(),
            commits,
            roots: graph.roots().map(|c| short_id(&c.id).to_string()).collect(),
            primary_path: graph
                .primary_path()
                .map(|c| c.short_id.clone())
                .collect(),
            edges,
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, DeltaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
