use gitdelta_core::DeltaError;

use crate::graph::HistoryGraph;

/// Walk first parents from the entry commit down to a root.
///
/// The resulting path starts at the entry commit and ends at a commit with
/// no resolved parent. An empty graph gets an empty path. The walk visits at
/// most one node per commit; needing more means the links contain a cycle.
///
/// # Errors
///
/// Returns [`DeltaError::Integrity`] if the walk exceeds the commit count.
/// The previous path is cleared either way.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::{build_primary_path, parse_log, resolve_links};
///
/// let log = "\
/// commit cccccccccc bbbbbbbbbb xxxxxxxxxx
///
/// commit xxxxxxxxxx aaaaaaaaaa
///
/// commit bbbbbbbbbb aaaaaaaaaa
///
/// commit aaaaaaaaaa
/// ";
/// let mut sink = Diagnostics::default();
/// let mut parsed = parse_log(log, &mut sink);
/// resolve_links(&mut parsed.graph, &parsed.requests, &mut sink);
/// build_primary_path(&mut parsed.graph).unwrap();
///
/// let path: Vec<&str> = parsed.graph.primary_path().map(|c| c.id.as_str()).collect();
/// assert_eq!(path, vec!["cccccccccc", "bbbbbbbbbb", "aaaaaaaaaa"]);
/// ```
pub fn build_primary_path(graph: &mut HistoryGraph) -> Result<(), DeltaError> {
    graph.set_primary_path(Vec::new());
    let Some(mut current) = graph.entry_index() else {
        return Ok(());
    };

    let mut path = Vec::new();
    loop {
        if path.len() == graph.len() {
            return Err(DeltaError::Integrity(format!(
                "first-parent walk from {} revisits commit {}",
                graph.entry_commit().map_or("", |c| c.short_id.as_str()),
                graph.commit(current).short_id
            )));
        }
        path.push(current);
        match graph.commit(current).parents().first() {
            Some(&parent) => current = parent,
            None => break,
        }
    }

    graph.set_primary_path(path);
    Ok(())
}
