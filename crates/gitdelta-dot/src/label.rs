//! Text shaping for node labels and node ids.

/// Summary characters before the first line break in a node label.
pub const FIRST_BREAK: usize = 67;

/// Summary characters between later line breaks.
pub const LINE_WIDTH: usize = 66;

/// Length of the id used for shared-history placeholder nodes.
pub const PLACEHOLDER_ID_LEN: usize = 7;

/// One-line node label from a commit summary, ready to be quoted.
///
/// Runs of whitespace collapse to one space, double quotes become single
/// quotes, and backslashes are escaped. A literal `\n` escape is inserted
/// after [`FIRST_BREAK`] summary characters and then after every
/// [`LINE_WIDTH`] more, as long as text follows. Break positions count
/// summary characters, not escape sequences.
///
/// # Examples
///
/// ```
/// use gitdelta_dot::label::node_label;
///
/// assert_eq!(node_label("  Fix \"quoted\"\tname  "), "Fix 'quoted' name");
/// assert_eq!(node_label(r"C:\dir\"), r"C:\\dir\\");
/// assert_eq!(node_label(&"x".repeat(70)), format!("{}\\n{}", "x".repeat(67), "xxx"));
/// ```
pub fn node_label(summary: &str) -> String {
    let mut label = String::with_capacity(summary.len());
    let mut next_break = FIRST_BREAK;

    let words = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    for (position, c) in words.chars().enumerate() {
        if position == next_break {
            label.push_str("\\n");
            next_break += LINE_WIDTH;
        }
        match c {
            '"' => label.push('\''),
            '\\' => label.push_str("\\\\"),
            other => label.push(other),
        }
    }
    label
}

/// Escape text for use inside an HTML-like DOT label.
///
/// # Examples
///
/// ```
/// use gitdelta_dot::label::html_escape;
///
/// assert_eq!(html_escape("fix/a&b<c>"), "fix/a&amp;b&lt;c&gt;");
/// ```
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Node id of the placeholder standing in for an unresolved parent.
pub fn placeholder_id(id: &str) -> &str {
    match id.char_indices().nth(PLACEHOLDER_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Quote a DOT identifier or attribute value.
pub fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}
