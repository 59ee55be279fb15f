use gitdelta_core::{DeltaError, DiagnosticSink};

use crate::graph::HistoryGraph;
use crate::link::resolve_links;
use crate::parser::ResolveRequest;
use crate::path::build_primary_path;

/// The commits of `a` that are not in `b`, as a freshly linked graph.
///
/// Every surviving commit is copied without links, keeping `a`'s order.
/// Its parent ids are taken from the links resolved in `a` and resolved
/// again inside the new graph: parents that survived become edges, parents
/// shared with `b` become unresolved ids marking the boundary to the common
/// history. The primary path is rebuilt on the result.
///
/// # Errors
///
/// Returns [`DeltaError::Integrity`] if the primary path cannot be built.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::{difference, parse_log_to_history};
///
/// let mut sink = Diagnostics::default();
/// let feature = parse_log_to_history(
///     "commit cccccccccc bbbbbbbbbb\n\ncommit bbbbbbbbbb aaaaaaaaaa\n\ncommit aaaaaaaaaa\n",
///     &mut sink,
/// ).unwrap();
/// let main = parse_log_to_history("commit aaaaaaaaaa\n", &mut sink).unwrap();
///
/// let delta = difference(&feature, &main, &mut sink).unwrap();
/// let ids: Vec<&str> = delta.commits().iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, vec!["cccccccccc", "bbbbbbbbbb"]);
///
/// let boundary = delta.get("bbbbbbbbbb").unwrap();
/// assert_eq!(boundary.unresolved_parents(), &["aaaaaaaaaa".to_string()]);
/// ```
pub fn difference(
    a: &HistoryGraph,
    b: &HistoryGraph,
    sink: &mut dyn DiagnosticSink,
) -> Result<HistoryGraph, DeltaError> {
    let mut delta = HistoryGraph::new();
    let mut requests = Vec::new();

    for commit in a.commits() {
        if b.contains(&commit.id) {
            continue;
        }
        let Some(owner) = delta.insert(commit.detached_copy()) else {
            continue;
        };
        let parent_ids = a.parents_of(commit).map(|parent| parent.id.clone()).collect();
        requests.push(ResolveRequest { owner, parent_ids });
    }

    resolve_links(&mut delta, &requests, sink);
    build_primary_path(&mut delta)?;
    Ok(delta)
}
