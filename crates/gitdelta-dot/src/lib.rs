//! Graphviz description of a delta graph.
//!
//! New commits become boxes, merges are rounded, and every parent outside
//! the graph gets one ellipse placeholder in the base branch colors. The
//! output is plain DOT text; rendering it is left to `dot`.

pub mod label;

use std::collections::HashSet;
use std::fmt::Write;

use gitdelta_core::GraphConfig;
use gitdelta_history::{edges, EdgeParent, HistoryGraph};

use crate::label::{html_escape, node_label, placeholder_id, quoted};

const TITLE_COLOR: &str = "#000080";
const NODE_LINE_COLOR: &str = "#000000";
const MERGE_TEXT_COLOR: &str = "#808080";
const MERGE_LINE_COLOR: &str = "#a0a0a4";
const EDGE_LINE_COLOR: &str = "#000000";
const EDGE_TEXT_COLOR: &str = "#808080";
const MERGE_EDGE_COLOR: &str = "#800000";
const NODE_FONT: &str = "Courier 10 pitch";
const EDGE_FONT: &str = "Arial";

/// How a graph is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotOptions {
    /// HTML-like title label, written verbatim inside `label=...;`.
    pub title: Option<String>,
    /// Text color of new commits and outline of roots.
    pub target_color: String,
    /// Outline of placeholders and color of edges into shared history.
    pub base_color: String,
    /// Text color of placeholders.
    pub base_text_color: String,
    /// Label edges with their range and any stored annotation.
    pub edge_labels: bool,
}

impl DotOptions {
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            title: None,
            target_color: config.target_color.clone(),
            base_color: config.base_color.clone(),
            base_text_color: config.base_text_color.clone(),
            edge_labels: config.edge_labels,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Default for DotOptions {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

/// Title naming the two branches and the number of new commits.
///
/// Branch names are HTML-escaped, since the title is an HTML-like label.
///
/// # Examples
///
/// ```
/// use gitdelta_dot::delta_title;
///
/// assert_eq!(
///     delta_title("main", "topic", 3),
///     "<<B>Graph of changes between</B>:<BR/><I>main</I>, and<BR/><I>topic</I><BR/>(3 new nodes)>"
/// );
/// ```
pub fn delta_title(base: &str, target: &str, new_nodes: usize) -> String {
    let base = html_escape(base);
    let target = html_escape(target);
    format!(
        "<<B>Graph of changes between</B>:<BR/><I>{base}</I>, and<BR/><I>{target}</I><BR/>({new_nodes} new nodes)>"
    )
}

/// Render `graph` as a DOT `digraph`.
///
/// Nodes are keyed by short id in graph order. Edges follow the edge
/// enumeration order: the first-parent edge of a primary-path commit is
/// bold, later parents use the merge edge color, and edges from unresolved
/// parents are dotted.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_dot::{write_graph, DotOptions};
/// use gitdelta_history::parse_log_to_history;
///
/// let graph = parse_log_to_history(
///     "commit bbbbbbbbbb aaaaaaaaaa\n\n    tip\n",
///     &mut Diagnostics::default(),
/// ).unwrap();
/// let dot = write_graph(&graph, &DotOptions::default());
/// assert!(dot.starts_with("# This graph represents a Git history of 1 elements\n"));
/// assert!(dot.contains("\"aaaaaaa\" -> \"bbbbbbbb\""));
/// assert!(dot.ends_with("}\n"));
/// ```
pub fn write_graph(graph: &HistoryGraph, options: &DotOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "# This graph represents a Git history of {} elements",
        graph.len()
    );
    out.push_str("digraph graphname {\n");

    if let Some(title) = &options.title {
        let _ = writeln!(
            out,
            "    fontname=\"monospace\"; fontcolor={}; fontsize=12;",
            quoted(TITLE_COLOR)
        );
        let _ = writeln!(out, "    label={title};");
    }

    let _ = writeln!(
        out,
        "    node [fontsize=8, color={}, fontcolor={}, shape=box, fontname={}];",
        quoted(NODE_LINE_COLOR),
        quoted(&options.target_color),
        quoted(NODE_FONT)
    );
    let _ = writeln!(
        out,
        "    edge [fontsize=8, color={}, fontcolor={}, fontname={}];",
        quoted(EDGE_LINE_COLOR),
        quoted(EDGE_TEXT_COLOR),
        quoted(EDGE_FONT)
    );

    write_nodes(&mut out, graph, options);
    write_edges(&mut out, graph, options);

    out.push_str("}\n");
    out
}

fn write_nodes(out: &mut String, graph: &HistoryGraph, options: &DotOptions) {
    out.push_str("    // nodes\n");
    let mut placeholders = HashSet::new();

    for commit in graph.commits() {
        let mut attributes = format!("label={}", quoted(&node_label(commit.summary())));
        if commit.is_merge() {
            let _ = write!(
                attributes,
                ", shape=box, style=rounded, color={}, fontcolor={}",
                quoted(MERGE_LINE_COLOR),
                quoted(MERGE_TEXT_COLOR)
            );
        }
        if commit.is_root() {
            let _ = write!(attributes, ", color={}", quoted(&options.target_color));
        }
        let _ = writeln!(out, "    {} [{attributes}];", quoted(&commit.short_id));

        for id in commit.unresolved_parents() {
            let name = placeholder_id(id);
            if placeholders.insert(name) {
                let _ = writeln!(
                    out,
                    "    {} [shape=ellipse, color={}, fontcolor={}];",
                    quoted(name),
                    quoted(&options.base_color),
                    quoted(&options.base_text_color)
                );
            }
        }
    }
}

fn write_edges(out: &mut String, graph: &HistoryGraph, options: &DotOptions) {
    out.push_str("    // edges\n");
    let primary: HashSet<_> = graph.primary_path_indices().iter().copied().collect();

    for edge in edges(graph, true) {
        let (from, style) = match edge.parent {
            EdgeParent::Resolved(parent) => {
                let style = if edge.position > 0 {
                    Some(format!("color={}", quoted(MERGE_EDGE_COLOR)))
                } else if primary.contains(&edge.child_index) {
                    Some("style=bold".to_string())
                } else {
                    None
                };
                (parent.short_id.as_str(), style)
            }
            EdgeParent::Unresolved(id) => (
                placeholder_id(id),
                Some(format!("style=dotted, color={}", quoted(&options.base_color))),
            ),
        };

        let mut attributes = Vec::new();
        if options.edge_labels {
            let range = edge.label();
            let text = match graph.annotation(&range) {
                Some(annotation) => format!("{range}  ({annotation})"),
                None => range,
            };
            attributes.push(format!("label={}", quoted(&text)));
        }
        attributes.extend(style);

        let _ = write!(out, "    {} -> {}", quoted(from), quoted(&edge.child.short_id));
        if !attributes.is_empty() {
            let _ = write!(out, " [{}]", attributes.join(", "));
        }
        out.push_str(";\n");
    }
}

#[cfg(test)]
mod tests {
    use gitdelta_core::Diagnostics;
    use gitdelta_history::parse_log_to_history;

    use super::*;

    // d merges c (first parent) and b; b and c share the missing parent z.
    const LOG: &str = "\
commit dddddddddd cccccccccc bbbbbbbbbb
Author: dev
Date: now

    Merge \"side\" into   main

commit cccccccccc zzzzzzzzzz
Author: dev
Date: now

    main work

commit bbbbbbbbbb zzzzzzzzzz
Author: dev
Date: now

    side work
";

    fn render(options: &DotOptions) -> String {
        let graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        write_graph(&graph, options)
    }

    fn line_with<'a>(dot: &'a str, needle: &str) -> &'a str {
        dot.lines()
            .find(|line| line.contains(needle))
            .unwrap_or_else(|| panic!("no line containing {needle} in\n{dot}"))
    }

    #[test]
    fn header_and_defaults() {
        let dot = render(&DotOptions::default());
        let mut lines = dot.lines();
        assert_eq!(
            lines.next(),
            Some("# This graph represents a Git history of 3 elements")
        );
        assert_eq!(lines.next(), Some("digraph graphname {"));
        assert_eq!(
            lines.next(),
            Some("    node [fontsize=8, color=\"#000000\", fontcolor=\"#0000ff\", shape=box, fontname=\"Courier 10 pitch\"];")
        );
        assert!(!dot.contains("label=<"));
    }

    #[test]
    fn title_is_written_when_present() {
        let dot = render(&DotOptions::default().with_title(delta_title("main", "topic", 3)));
        assert!(dot.contains("    fontname=\"monospace\"; fontcolor=\"#000080\"; fontsize=12;\n"));
        assert!(dot.contains("(3 new nodes)>;\n"));
    }

    #[test]
    fn title_escapes_branch_names() {
        let title = delta_title("fix&<x>", "feature/<y>", 1);
        assert!(title.contains("<I>fix&amp;&lt;x&gt;</I>, and<BR/><I>feature/&lt;y&gt;</I>"));
        assert!(title.starts_with("<<B>") && title.ends_with("(1 new nodes)>"));
    }

    #[test]
    fn merge_node_is_rounded_with_clean_label() {
        let dot = render(&DotOptions::default());
        let merge = line_with(&dot, "\"dddddddd\" [");
        assert!(merge.contains("label=\"Merge 'side' into main\""));
        assert!(merge.contains("style=rounded"));
        assert!(!merge.contains("color=\"#0000ff\""));
    }

    #[test]
    fn roots_are_outlined_in_target_color() {
        let dot = render(&DotOptions::default());
        assert!(line_with(&dot, "\"cccccccc\" [").ends_with(", color=\"#0000ff\"];"));
    }

    #[test]
    fn placeholder_emitted_once() {
        let dot = render(&DotOptions::default());
        let count = dot
            .lines()
            .filter(|line| line.starts_with("    \"zzzzzzz\" [shape=ellipse"))
            .count();
        assert_eq!(count, 1);
        assert!(dot.contains("color=\"#006400\", fontcolor=\"#003200\""));
    }

    #[test]
    fn edge_styles() {
        let dot = render(&DotOptions::default());
        assert_eq!(
            line_with(&dot, "\"cccccccc\" -> \"dddddddd\""),
            "    \"cccccccc\" -> \"dddddddd\" [label=\"cccccccc...dddddddd\", style=bold];"
        );
        assert_eq!(
            line_with(&dot, "\"bbbbbbbb\" -> \"dddddddd\""),
            "    \"bbbbbbbb\" -> \"dddddddd\" [label=\"bbbbbbbb...dddddddd\", color=\"#800000\"];"
        );
        assert_eq!(
            line_with(&dot, "\"zzzzzzz\" -> \"bbbbbbbb\""),
            "    \"zzzzzzz\" -> \"bbbbbbbb\" [label=\"zzzzzzzz...bbbbbbbb\", style=dotted, color=\"#006400\"];"
        );
    }

    #[test]
    fn unlabeled_edges_keep_styles() {
        let dot = render(&DotOptions {
            edge_labels: false,
            ..DotOptions::default()
        });
        assert!(dot.contains("    \"cccccccc\" -> \"dddddddd\" [style=bold];\n"));
        assert!(!dot.contains("label=\"zzzzzzzz"));
    }

    #[test]
    fn annotations_extend_edge_labels() {
        let mut graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        graph.set_annotation("cccccccc...dddddddd", "+12 -4");
        let dot = write_graph(&graph, &DotOptions::default());
        assert!(dot.contains("label=\"cccccccc...dddddddd  (+12 -4)\""));
    }

    #[test]
    fn empty_graph_is_still_a_digraph() {
        let dot = write_graph(&HistoryGraph::new(), &DotOptions::default());
        assert!(dot.starts_with("# This graph represents a Git history of 0 elements\n"));
        assert!(dot.contains("    // nodes\n    // edges\n}\n"));
    }

    #[test]
    fn options_follow_config() {
        let config = GraphConfig {
            target_color: "red".into(),
            edge_labels: false,
            ..GraphConfig::default()
        };
        let options = DotOptions::from_config(&config);
        assert_eq!(options.target_color, "red");
        assert!(!options.edge_labels);
        assert!(options.title.is_none());
    }
}
