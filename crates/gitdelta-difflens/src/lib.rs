//! Diff summary parsing.
//!
//! Turns the free-text output of `git diff --stat` into the compact
//! `+<insertions> -<deletions>` annotations drawn on graph edges.

pub mod diffstat;

pub use diffstat::{parse_diff_stat, DiffStat, NO_CHANGES};
