//! Ordered edge enumeration and range labels.
//!
//! The order is: commits in graph order, then each commit's resolved
//! parents, then (optionally) its unresolved parent ids. Diff-stat
//! annotation and the DOT writer both walk edges in this order.

use crate::graph::{short_id, Commit, CommitIdx, HistoryGraph};

/// The parent end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeParent<'a> {
    /// A parent node inside the graph.
    Resolved(&'a Commit),
    /// A parent id with no node in the graph.
    Unresolved(&'a str),
}

/// One parent-to-child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub child: &'a Commit,
    pub child_index: CommitIdx,
    pub parent: EdgeParent<'a>,
    /// Position of the parent within its list (resolved or unresolved).
    pub position: usize,
}

impl Edge<'_> {
    /// The `"<parent>...<child>"` range this edge covers.
    pub fn label(&self) -> String {
        match self.parent {
            EdgeParent::Resolved(parent) => range_label(&parent.short_id, &self.child.short_id),
            EdgeParent::Unresolved(id) => range_label(short_id(id), &self.child.short_id),
        }
    }

    /// `true` for the edge to the child's first resolved parent.
    pub fn is_first_parent(&self) -> bool {
        matches!(self.parent, EdgeParent::Resolved(_)) && self.position == 0
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.parent, EdgeParent::Resolved(_))
    }
}

/// Format a range label from two display ids.
///
/// # Examples
///
/// ```
/// use gitdelta_history::edges::range_label;
///
/// assert_eq!(range_label("fc3566dd", "7a4d3c3a"), "fc3566dd...7a4d3c3a");
/// ```
pub fn range_label(parent: &str, child: &str) -> String {
    format!("{parent}...{child}")
}

/// Every edge of `graph` in enumeration order.
pub fn edges(graph: &HistoryGraph, include_unresolved: bool) -> Vec<Edge<'_>> {
    let mut out = Vec::new();
    for (child_index, child) in graph.iter() {
        for (position, parent) in graph.parents_of(child).enumerate() {
            out.push(Edge {
                child,
                child_index,
                parent: EdgeParent::Resolved(parent),
                position,
            });
        }
        if include_unresolved {
            for (position, id) in child.unresolved_parents().iter().enumerate() {
                out.push(Edge {
                    child,
                    child_index,
                    parent: EdgeParent::Unresolved(id.as_str()),
                    position,
                });
            }
        }
    }
    out
}

/// Range labels of every edge, one per diff-stat query.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::{enumerate_edges, parse_log_to_history};
///
/// let graph = parse_log_to_history(
///     "commit bbbbbbbbbb aaaaaaaaaa 9999999999\n\ncommit aaaaaaaaaa\n",
///     &mut Diagnostics::default(),
/// ).unwrap();
/// assert_eq!(enumerate_edges(&graph, false), vec!["aaaaaaaa...bbbbbbbb"]);
/// assert_eq!(
///     enumerate_edges(&graph, true),
///     vec!["aaaaaaaa...bbbbbbbb", "99999999...bbbbbbbb"]
/// );
/// ```
pub fn enumerate_edges(graph: &HistoryGraph, include_unresolved: bool) -> Vec<String> {
    edges(graph, include_unresolved)
        .iter()
        .map(Edge::label)
        .collect()
}

#[cfg(test)]
mod tests {
    use gitdelta_core::Diagnostics;

    use super::*;
    use crate::parser::parse_log_to_history;

    const LOG: &str = "\
commit dddddddddd cccccccccc bbbbbbbbbb
commit cccccccccc aaaaaaaaaa 1111111111
commit bbbbbbbbbb aaaaaaaaaa
commit aaaaaaaaaa 2222222222 3333333333
";

    fn graph() -> HistoryGraph {
        parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap()
    }

    #[test]
    fn node_then_parent_then_unresolved_order() {
        let labels = enumerate_edges(&graph(), true);
        assert_eq!(
            labels,
            vec![
                "cccccccc...dddddddd",
                "bbbbbbbb...dddddddd",
                "aaaaaaaa...cccccccc",
                "11111111...cccccccc",
                "aaaaaaaa...bbbbbbbb",
                "22222222...aaaaaaaa",
                "33333333...aaaaaaaa",
            ]
        );
    }

    #[test]
    fn label_count_matches_parent_totals() {
        let graph = graph();
        let expected: usize = graph
            .commits()
            .iter()
            .map(|c| c.parents().len() + c.unresolved_parents().len())
            .sum();
        assert_eq!(enumerate_edges(&graph, true).len(), expected);
        let resolved: usize = graph.commits().iter().map(|c| c.parents().len()).sum();
        assert_eq!(enumerate_edges(&graph, false).len(), resolved);
    }

    #[test]
    fn first_parent_flags() {
        let graph = graph();
        let flags: Vec<bool> = edges(&graph, true).iter().map(Edge::is_first_parent).collect();
        assert_eq!(flags, vec![true, false, true, false, true, false, false]);
    }

    #[test]
    fn empty_graph_has_no_edges() {
        assert!(enumerate_edges(&HistoryGraph::new(), true).is_empty());
    }
}
