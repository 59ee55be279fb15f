//! Commit history graphs built from `git log --parents` text.
//!
//! A log is parsed into an arena of [`Commit`] nodes plus deferred parent
//! requests, the requests are resolved into edges, and the first-parent
//! chain from the branch tip becomes the primary path. Two such graphs can
//! be subtracted into a delta graph whose edges drive one diff-stat query
//! each.

pub mod branches;
pub mod collect;
pub mod delta;
pub mod edges;
pub mod graph;
pub mod link;
pub mod parser;
pub mod path;
pub mod report;

pub use delta::difference;
pub use edges::{edges, enumerate_edges, Edge, EdgeParent};
pub use graph::{short_id, Commit, CommitIdx, HistoryGraph, SHORT_ID_LEN};
pub use link::{resolve_links, LinkStats};
pub use parser::{parse_log, parse_log_to_history, ParsedLog, ResolveRequest};
pub use path::build_primary_path;
pub use report::DeltaReport;
