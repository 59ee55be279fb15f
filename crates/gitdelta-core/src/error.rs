use std::path::PathBuf;

/// Errors that can occur across gitdelta.
///
/// Malformed log or diff-stat lines are not errors: they are reported to a
/// [`DiagnosticSink`](crate::DiagnosticSink) and parsing continues. Library
/// crates return this type; the binary converts to `miette::Report` at the
/// boundary.
///
/// # Examples
///
/// ```
/// use gitdelta_core::DeltaError;
///
/// let err = DeltaError::Git("git log exited with status 128".into());
/// assert!(err.to_string().contains("status 128"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DeltaError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required git command failed or timed out.
    #[error("git error: {0}")]
    Git(String),

    /// A graph invariant was violated (e.g. a parent cycle).
    #[error("history integrity error: {0}")]
    Integrity(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DeltaError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn integrity_error_displays_message() {
        let err = DeltaError::Integrity("cycle at 1234abcd".into());
        assert_eq!(err.to_string(), "history integrity error: cycle at 1234abcd");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = DeltaError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }

    #[test]
    fn toml_error_converts() {
        let toml_err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: DeltaError = toml_err.into();
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}
