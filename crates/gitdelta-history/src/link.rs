use gitdelta_core::DiagnosticSink;

use crate::graph::HistoryGraph;
use crate::parser::ResolveRequest;

/// Counts of what [`resolve_links`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Parent edges added.
    pub linked: usize,
    /// Parent ids recorded as unresolved.
    pub unresolved: usize,
}

/// Turn deferred parent requests into edges.
///
/// Each parent id found in the graph is appended to the owner's parents in
/// request order, and the owner stops being a root. Ids with no node are
/// appended to the owner's unresolved parents instead. Links and ids that
/// are already present are not added twice, so a request can be resolved
/// again safely. Self-references are reported and dropped.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::{parse_log, resolve_links};
///
/// let log = "commit bbbbbbbbbb aaaaaaaaaa cccccccccc\n\ncommit aaaaaaaaaa\n";
/// let mut sink = Diagnostics::default();
/// let mut parsed = parse_log(log, &mut sink);
/// let stats = resolve_links(&mut parsed.graph, &parsed.requests, &mut sink);
/// assert_eq!((stats.linked, stats.unresolved), (1, 1));
///
/// let tip = parsed.graph.entry_commit().unwrap();
/// assert_eq!(tip.unresolved_parents(), &["cccccccccc".to_string()]);
/// assert_eq!(parsed.graph.roots().next().unwrap().id, "aaaaaaaaaa");
/// ```
pub fn resolve_links(
    graph: &mut HistoryGraph,
    requests: &[ResolveRequest],
    sink: &mut dyn DiagnosticSink,
) -> LinkStats {
    let mut stats = LinkStats::default();

    for request in requests {
        let owner = request.owner;
        for parent_id in &request.parent_ids {
            if *parent_id == graph.commit(owner).id {
                sink.warn(format!(
                    "commit {} lists itself as a parent, ignoring",
                    graph.commit(owner).short_id
                ));
                continue;
            }

            match graph.index_of(parent_id) {
                Some(parent) => {
                    if graph.link_parent(owner, parent) {
                        stats.linked += 1;
                    }
                    graph.remove_root(owner);
                }
                None => {
                    if graph.add_unresolved(owner, parent_id) {
                        stats.unresolved += 1;
                    }
                }
            }
        }
    }

    stats
}
