//! `git log --parents` text to commit nodes.
//!
//! Parents are named on a commit's own header but usually defined further
//! down the stream, so parsing only records [`ResolveRequest`]s. Linking is
//! a separate pass in [`resolve_links`](crate::resolve_links).

use gitdelta_core::{DeltaError, DiagnosticSink, Severity};

use crate::graph::{Commit, CommitIdx, HistoryGraph};
use crate::link::resolve_links;
use crate::path::build_primary_path;

/// Prefix of the line that starts every commit block.
pub const HEADER_TOKEN: &str = "commit ";

const AUTHOR_PREFIX: &str = "Author:";
const DATE_PREFIX: &str = "Date:";
const MERGE_PREFIX: &str = "Merge:";

/// Parent ids named by one commit header, waiting to be linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub owner: CommitIdx,
    /// Parent ids in header order; the first is the primary parent.
    pub parent_ids: Vec<String>,
}

/// A graph with all commits recorded but no parent links yet.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub graph: HistoryGraph,
    pub requests: Vec<ResolveRequest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the first header.
    SeekingHeader,
    /// Ignoring the block of a rejected header.
    Skipping,
    /// Author/Merge/Date lines.
    Metadata,
    /// The line right after `Date:`, which must be blank.
    ExpectBlank,
    Message,
}

struct LogParser<'s> {
    state: State,
    current: Option<CommitIdx>,
    parsed: ParsedLog,
    sink: &'s mut dyn DiagnosticSink,
}

impl<'s> LogParser<'s> {
    fn new(sink: &'s mut dyn DiagnosticSink) -> Self {
        Self {
            state: State::SeekingHeader,
            current: None,
            parsed: ParsedLog::default(),
            sink,
        }
    }

    fn feed(&mut self, lineno: usize, line: &str) {
        if let Some(rest) = line.strip_prefix(HEADER_TOKEN) {
            if self.state == State::ExpectBlank {
                self.sink.warn(format!(
                    "line {lineno}: expected blank line after Date, found a header"
                ));
            }
            self.start_commit(lineno, rest);
            return;
        }

        match self.state {
            State::SeekingHeader => {
                if !line.trim().is_empty() {
                    self.sink
                        .warn(format!("line {lineno}: ignoring text before first commit"));
                }
            }
            State::Skipping => {}
            State::Metadata => self.metadata(lineno, line),
            State::ExpectBlank => {
                if !line.trim().is_empty() {
                    self.sink.warn(format!(
                        "line {lineno}: expected blank line after Date, keeping it as message"
                    ));
                    self.push_message(line);
                }
                self.state = State::Message;
            }
            State::Message => self.push_message(line),
        }
    }

    fn start_commit(&mut self, lineno: usize, rest: &str) {
        let mut ids = rest
            .split_whitespace()
            .take_while(|token| !token.starts_with('('));

        let Some(id) = ids.next() else {
            self.sink
                .warn(format!("line {lineno}: commit header without an id"));
            self.enter_skipping();
            return;
        };

        let Some(owner) = self.parsed.graph.insert(Commit::new(id)) else {
            self.sink.warn(format!(
                "line {lineno}: commit {id} already seen, skipping its block"
            ));
            self.enter_skipping();
            return;
        };

        let parent_ids: Vec<String> = ids.map(str::to_string).collect();
        if !parent_ids.is_empty() {
            self.parsed.requests.push(ResolveRequest { owner, parent_ids });
        }

        self.current = Some(owner);
        self.state = State::Metadata;
    }

    fn enter_skipping(&mut self) {
        self.current = None;
        self.state = State::Skipping;
    }

    fn metadata(&mut self, lineno: usize, line: &str) {
        let Some(idx) = self.current else {
            return;
        };

        if let Some(author) = line.strip_prefix(AUTHOR_PREFIX) {
            self.parsed.graph.commit_mut(idx).author = author.trim().to_string();
        } else if let Some(date) = line.strip_prefix(DATE_PREFIX) {
            self.parsed.graph.commit_mut(idx).date = date.trim().to_string();
            self.state = State::ExpectBlank;
        } else if line.starts_with(MERGE_PREFIX) {
            // the header already lists every parent
        } else if line.trim().is_empty() {
            self.sink.record(
                Severity::Info,
                format!("line {lineno}: message starts without a Date line"),
            );
            self.state = State::Message;
        } else {
            self.sink.warn(format!(
                "line {lineno}: unexpected metadata line: {}",
                line.trim()
            ));
        }
    }

    fn push_message(&mut self, line: &str) {
        if let Some(idx) = self.current {
            let message = &mut self.parsed.graph.commit_mut(idx).message;
            message.push_str(line);
            message.push('\n');
        }
    }
}

/// Parse raw `git log --parents` output into unlinked commits plus the
/// parent requests that [`resolve_links`] turns into edges.
///
/// No line is fatal. Unexpected lines are reported to `sink` and skipped.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_history::parse_log;
///
/// let log = "commit bbbbbbbbbb aaaaaaaaaa\nAuthor: B\nDate:   today\n\n    tip\n";
/// let parsed = parse_log(log, &mut Diagnostics::default());
/// assert_eq!(parsed.graph.len(), 1);
/// assert_eq!(parsed.requests[0].parent_ids, vec!["aaaaaaaaaa"]);
/// ```
pub fn parse_log(input: &str, sink: &mut dyn DiagnosticSink) -> ParsedLog {
    let mut parser = LogParser::new(sink);
    for (n, line) in input.lines().enumerate() {
        parser.feed(n + 1, line);
    }
    parser.parsed
}

/// Parse, link, and build the primary path in one call.
///
/// # Errors
///
/// Returns [`DeltaError::Integrity`] if the parent links form a cycle.
pub fn parse_log_to_history(
    input: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<HistoryGraph, DeltaError> {
    let ParsedLog {
        mut graph,
        requests,
    } = parse_log(input, sink);
    resolve_links(&mut graph, &requests, sink);
    build_primary_path(&mut graph)?;
    Ok(graph)
}
