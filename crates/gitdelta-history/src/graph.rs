use std::collections::{BTreeMap, HashMap};

/// Number of leading id characters used for display and range labels.
pub const SHORT_ID_LEN: usize = 8;

/// The first [`SHORT_ID_LEN`] characters of `id` (or all of it if shorter).
///
/// # Examples
///
/// ```
/// use gitdelta_history::short_id;
///
/// assert_eq!(short_id("7a4d3c3a5889a3486eeb8d9bd61d64d669712b78"), "7a4d3c3a");
/// assert_eq!(short_id("abc"), "abc");
/// ```
pub fn short_id(id: &str) -> &str {
    prefix(id, SHORT_ID_LEN)
}

pub(crate) fn prefix(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Index of a [`Commit`] inside the [`HistoryGraph`] that owns it.
///
/// Indices are only meaningful for the graph that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitIdx(usize);

/// One commit node.
///
/// Metadata is immutable once parsed; the parent links are filled in by
/// [`resolve_links`](crate::resolve_links) and are only reachable through
/// the owning graph.
///
/// # Examples
///
/// ```
/// use gitdelta_history::Commit;
///
/// let mut commit = Commit::new("fc3566dd8afb671f5f2629103dc98fc790e21a90");
/// commit.message = "    Fix the frobnicator\n\n    Details.\n".into();
/// assert_eq!(commit.short_id, "fc3566dd");
/// assert_eq!(commit.summary(), "Fix the frobnicator");
/// assert!(commit.is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Full commit identifier.
    pub id: String,
    /// Display prefix of `id`.
    pub short_id: String,
    pub author: String,
    pub date: String,
    /// Message body, one newline-terminated line per source line.
    pub message: String,
    parents: Vec<CommitIdx>,
    unresolved_parents: Vec<String>,
}

impl Commit {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let short_id = short_id(&id).to_string();
        Self {
            id,
            short_id,
            ..Self::default()
        }
    }

    /// Resolved parents, first parent first.
    pub fn parents(&self) -> &[CommitIdx] {
        &self.parents
    }

    /// Parent ids that have no node in the owning graph, in source order.
    pub fn unresolved_parents(&self) -> &[String] {
        &self.unresolved_parents
    }

    /// No resolved parent in this graph.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// More than one parent, counting unresolved ones.
    pub fn is_merge(&self) -> bool {
        self.parents.len() + self.unresolved_parents.len() > 1
    }

    /// First non-blank message line, trimmed.
    pub fn summary(&self) -> &str {
        self.message
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }

    /// A copy of the metadata without any links.
    pub fn detached_copy(&self) -> Self {
        Self {
            id: self.id.clone(),
            short_id: self.short_id.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
            message: self.message.clone(),
            parents: Vec::new(),
            unresolved_parents: Vec::new(),
        }
    }
}

/// An owning arena of commits with id lookup, roots, and primary path.
///
/// Commits are kept in encounter order (newest first for a parsed log).
/// The first inserted commit is the entry commit.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::parse_log_to_history;
///
/// let log = "\
/// commit 2222222222 1111111111
/// Author: A <a@example.com>
/// Date:   Thu Apr 22 06:51:03 2010 -0700
///
///     second
///
/// commit 1111111111
/// Author: A <a@example.com>
/// Date:   Wed Apr 21 06:51:03 2010 -0700
///
///     first
/// ";
/// let graph = parse_log_to_history(log, &mut Diagnostics::default()).unwrap();
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.entry_commit().unwrap().short_id, "22222222");
/// assert_eq!(graph.roots().count(), 1);
/// assert_eq!(graph.primary_path().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryGraph {
    commits: Vec<Commit>,
    by_id: HashMap<String, CommitIdx>,
    entry: Option<CommitIdx>,
    roots: Vec<CommitIdx>,
    primary_path: Vec<CommitIdx>,
    edge_annotations: BTreeMap<String, String>,
}

impl HistoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// All commits in encounter order.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// Indices paired with commits, in encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (CommitIdx, &Commit)> {
        self.commits
            .iter()
            .enumerate()
            .map(|(i, commit)| (CommitIdx(i), commit))
    }

    /// # Panics
    ///
    /// Panics if `idx` was not produced by this graph.
    pub fn commit(&self, idx: CommitIdx) -> &Commit {
        &self.commits[idx.0]
    }

    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.index_of(id).map(|idx| self.commit(idx))
    }

    pub fn index_of(&self, id: &str) -> Option<CommitIdx> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The first commit encountered, conventionally the branch tip.
    pub fn entry_commit(&self) -> Option<&Commit> {
        self.entry.map(|idx| self.commit(idx))
    }

    pub fn entry_index(&self) -> Option<CommitIdx> {
        self.entry
    }

    /// Commits without a resolved parent, in encounter order.
    pub fn roots(&self) -> impl Iterator<Item = &Commit> {
        self.roots.iter().map(|&idx| self.commit(idx))
    }

    pub fn root_indices(&self) -> &[CommitIdx] {
        &self.roots
    }

    /// The first-parent chain from the entry commit; empty until built.
    pub fn primary_path(&self) -> impl Iterator<Item = &Commit> {
        self.primary_path.iter().map(|&idx| self.commit(idx))
    }

    pub fn primary_path_indices(&self) -> &[CommitIdx] {
        &self.primary_path
    }

    /// Resolved parents of `commit`, which must belong to this graph.
    pub fn parents_of<'a>(&'a self, commit: &'a Commit) -> impl Iterator<Item = &'a Commit> {
        commit.parents.iter().map(|&idx| self.commit(idx))
    }

    /// Annotations keyed by range label.
    pub fn edge_annotations(&self) -> &BTreeMap<String, String> {
        &self.edge_annotations
    }

    pub fn annotation(&self, label: &str) -> Option<&str> {
        self.edge_annotations.get(label).map(String::as_str)
    }

    pub fn set_annotation(&mut self, label: impl Into<String>, annotation: impl Into<String>) {
        self.edge_annotations.insert(label.into(), annotation.into());
    }

    /// Add a commit; returns `None` if its id is already present.
    pub(crate) fn insert(&mut self, commit: Commit) -> Option<CommitIdx> {
        if self.by_id.contains_key(&commit.id) {
            return None;
        }
        let idx = CommitIdx(self.commits.len());
        self.by_id.insert(commit.id.clone(), idx);
        self.commits.push(commit);
        self.roots.push(idx);
        if self.entry.is_none() {
            self.entry = Some(idx);
        }
        Some(idx)
    }

    pub(crate) fn commit_mut(&mut self, idx: CommitIdx) -> &mut Commit {
        &mut self.commits[idx.0]
    }

    /// Append `parent` to `owner`'s parents unless already linked.
    pub(crate) fn link_parent(&mut self, owner: CommitIdx, parent: CommitIdx) -> bool {
        let parents = &mut self.commits[owner.0].parents;
        if parents.contains(&parent) {
            return false;
        }
        parents.push(parent);
        true
    }

    /// Record an id with no node in this graph, unless already recorded.
    pub(crate) fn add_unresolved(&mut self, owner: CommitIdx, id: &str) -> bool {
        let unresolved = &mut self.commits[owner.0].unresolved_parents;
        if unresolved.iter().any(|existing| existing == id) {
            return false;
        }
        unresolved.push(id.to_string());
        true
    }

    pub(crate) fn remove_root(&mut self, idx: CommitIdx) {
        self.roots.retain(|&root| root != idx);
    }

    pub(crate) fn set_primary_path(&mut self, path: Vec<CommitIdx>) {
        self.primary_path = path;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_is_char_boundary_safe() {
        assert_eq!(short_id("ééééééééé"), "éééééééé");
        assert_eq!(short_id(""), "");
        assert_eq!(prefix("abcdefghij", 7), "abcdefg");
    }

    #[test]
    fn insert_tracks_entry_roots_and_lookup() {
        let mut graph = HistoryGraph::new();
        let a = graph.insert(Commit::new("aaaaaaaaaa")).unwrap();
        let b = graph.insert(Commit::new("bbbbbbbbbb")).unwrap();
        assert_eq!(graph.entry_index(), Some(a));
        assert_eq!(graph.root_indices(), &[a, b]);
        assert_eq!(graph.index_of("bbbbbbbbbb"), Some(b));
        assert!(graph.get("cccccccccc").is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut graph = HistoryGraph::new();
        assert!(graph.insert(Commit::new("aaaa")).is_some());
        assert!(graph.insert(Commit::new("aaaa")).is_none());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn links_are_deduplicated() {
        let mut graph = HistoryGraph::new();
        let child = graph.insert(Commit::new("child")).unwrap();
        let parent = graph.insert(Commit::new("parent")).unwrap();
        assert!(graph.link_parent(child, parent));
        assert!(!graph.link_parent(child, parent));
        assert!(graph.add_unresolved(child, "outside"));
        assert!(!graph.add_unresolved(child, "outside"));
        assert_eq!(graph.commit(child).parents(), &[parent]);
        assert_eq!(graph.commit(child).unresolved_parents(), &["outside".to_string()]);
        assert!(graph.commit(child).is_merge());
    }

    #[test]
    fn detached_copy_drops_links() {
        let mut graph = HistoryGraph::new();
        let child = graph.insert(Commit::new("child")).unwrap();
        let parent = graph.insert(Commit::new("parent")).unwrap();
        graph.link_parent(child, parent);
        graph.commit_mut(child).author = "someone".into();
        let copy = graph.commit(child).detached_copy();
        assert_eq!(copy.author, "someone");
        assert!(copy.parents().is_empty());
        assert!(copy.unresolved_parents().is_empty());
    }

    #[test]
    fn summary_of_empty_message_is_empty() {
        assert_eq!(Commit::new("x").summary(), "");
    }

    #[test]
    fn annotations_are_keyed_by_label() {
        let mut graph = HistoryGraph::new();
        graph.set_annotation("aaaa...bbbb", "+1 -0");
        assert_eq!(graph.annotation("aaaa...bbbb"), Some("+1 -0"));
        assert_eq!(graph.edge_annotations().len(), 1);
    }
}
