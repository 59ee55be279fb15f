use std::fmt;

use gitdelta_core::DiagnosticSink;

const INSERTION_MARKER: &str = "insertion";
const DELETION_MARKER: &str = "deletion";

/// Annotation for an edge whose diff summary is empty.
pub const NO_CHANGES: &str = "=";

/// The summary line of `git diff --stat`.
///
/// # Examples
///
/// ```
/// use gitdelta_difflens::DiffStat;
///
/// let stat = DiffStat::parse_line(" 5 files changed, 10 insertions(+), 3 deletions(-)").unwrap();
/// assert_eq!(stat.files, 5);
/// assert_eq!(stat.to_string(), "+10 -3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffStat {
    /// Number of files touched.
    pub files: u32,
    /// Lines inserted.
    pub insertions: u32,
    /// Lines deleted.
    pub deletions: u32,
}

impl DiffStat {
    /// Parse one `"<n> files changed, <i> insertions(+), <d> deletions(-)"` line.
    ///
    /// Returns `None` unless the line has exactly three comma-separated
    /// fields, each starting with an integer.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').filter(|f| !f.is_empty()).collect();
        let [files, insertions, deletions] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            files: leading_number(files)?,
            insertions: leading_number(insertions)?,
            deletions: leading_number(deletions)?,
        })
    }
}

impl fmt::Display for DiffStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} -{}", self.insertions, self.deletions)
    }
}

fn leading_number(field: &str) -> Option<u32> {
    field.trim().split(' ').next()?.parse().ok()
}

/// Parse `git diff --stat` output into a short edge annotation.
///
/// Returns:
/// - [`NO_CHANGES`] (`"="`) for empty output,
/// - `"+<I> -<D>"` for the first line mentioning both insertions and
///   deletions that splits into exactly three fields,
/// - an empty string when nothing usable was found.
///
/// Non-blank output with no line carrying both markers gives the empty
/// string, never [`NO_CHANGES`]. That covers deletions-only and
/// insertions-only summaries such as `" 1 file changed, 5 deletions(-)"`,
/// which git prints without the missing half.
///
/// Candidate lines with the wrong shape are reported to `sink` and
/// skipped; scanning continues.
///
/// # Examples
///
/// ```
/// use gitdelta_core::Diagnostics;
/// use gitdelta_difflens::parse_diff_stat;
///
/// let mut sink = Diagnostics::default();
/// let out = " src/lib.rs | 13 ++++++++++---\n 1 file changed, 10 insertions(+), 3 deletions(-)\n";
/// assert_eq!(parse_diff_stat(out, &mut sink), "+10 -3");
/// assert_eq!(parse_diff_stat("", &mut sink), "=");
/// assert_eq!(parse_diff_stat("no relevant content", &mut sink), "");
/// ```
pub fn parse_diff_stat(input: &str, sink: &mut dyn DiagnosticSink) -> String {
    if input.trim().is_empty() {
        return NO_CHANGES.to_string();
    }

    for line in input.lines() {
        if !line.contains(INSERTION_MARKER) || !line.contains(DELETION_MARKER) {
            continue;
        }
        match DiffStat::parse_line(line) {
            Some(stat) => return stat.to_string(),
            None => sink.warn(format!(
                "diff stat: expected 3 numeric fields, ignoring line: {}",
                line.trim()
            )),
        }
    }

    String::new()
}
