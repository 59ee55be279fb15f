use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DeltaError;

/// Top-level configuration loaded from `.gitdelta.toml`.
///
/// Supports layered resolution: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use gitdelta_core::DeltaConfig;
///
/// let config = DeltaConfig::default();
/// assert_eq!(config.git.timeout_secs, 60);
/// assert_eq!(config.graph.output, "graph.dot");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeltaConfig {
    /// How git text inputs are obtained.
    #[serde(default)]
    pub git: GitConfig,
    /// How the graph description is written.
    #[serde(default)]
    pub graph: GraphConfig,
}

impl DeltaConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::FileNotFound`] if the file does not exist,
    /// [`DeltaError::Io`] if it cannot be read, or [`DeltaError::Toml`] if
    /// the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, DeltaError> {
        if !path.exists() {
            return Err(DeltaError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DeltaError::Toml`] if parsing fails, or
    /// [`DeltaError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitdelta_core::DeltaConfig;
    ///
    /// let toml = r#"
    /// [git]
    /// timeout_secs = 120
    /// "#;
    /// let config = DeltaConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.git.timeout_secs, 120);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, DeltaError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), DeltaError> {
        if self.git.timeout_secs == 0 {
            return Err(DeltaError::Config("git.timeout_secs must be positive".into()));
        }
        for (key, command) in [
            ("git.log_command", &self.git.log_command),
            ("git.diff_stat_command", &self.git.diff_stat_command),
            ("git.branch_command", &self.git.branch_command),
        ] {
            if command.trim().is_empty() {
                return Err(DeltaError::Config(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Settings for the external git commands whose text output is parsed.
///
/// # Examples
///
/// ```
/// use gitdelta_core::GitConfig;
///
/// let config = GitConfig::default();
/// assert_eq!(config.log_command, "git log --parents");
/// assert_eq!(config.slow_diff_secs, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Upper bound for a single command, in seconds (default: 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Edge diffs slower than this are reported as huge (default: 10).
    #[serde(default = "default_slow_diff_secs")]
    pub slow_diff_secs: u64,
    /// Command producing the "log with parents" text; the branch is appended.
    #[serde(default = "default_log_command")]
    pub log_command: String,
    /// Command producing a diff summary; the range label is appended.
    #[serde(default = "default_diff_stat_command")]
    pub diff_stat_command: String,
    /// Command listing local and remote branches.
    #[serde(default = "default_branch_command")]
    pub branch_command: String,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_slow_diff_secs() -> u64 {
    10
}

fn default_log_command() -> String {
    "git log --parents".into()
}

fn default_diff_stat_command() -> String {
    "git diff --stat".into()
}

fn default_branch_command() -> String {
    "git branch -a".into()
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            slow_diff_secs: default_slow_diff_secs(),
            log_command: default_log_command(),
            diff_stat_command: default_diff_stat_command(),
            branch_command: default_branch_command(),
        }
    }
}

/// Settings for the graph description handed to the renderer.
///
/// Colors are Graphviz color strings. The target branch colors the new
/// commits; the base branch colors the placeholders for shared history.
///
/// # Examples
///
/// ```
/// use gitdelta_core::GraphConfig;
///
/// let config = GraphConfig::default();
/// assert!(config.edge_labels);
/// assert!(!config.edge_stats);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Path of the DOT file to write (default: `graph.dot`).
    #[serde(default = "default_output")]
    pub output: String,
    /// Color of new commits (default: blue).
    #[serde(default = "default_target_color")]
    pub target_color: String,
    /// Outline color of shared-history placeholders (default: dark green).
    #[serde(default = "default_base_color")]
    pub base_color: String,
    /// Text color of shared-history placeholders.
    #[serde(default = "default_base_text_color")]
    pub base_text_color: String,
    /// Label every edge with its range (default: true).
    #[serde(default = "default_true")]
    pub edge_labels: bool,
    /// Run one diff-stat per edge and append the result (default: false).
    #[serde(default)]
    pub edge_stats: bool,
}

fn default_output() -> String {
    "graph.dot".into()
}

fn default_target_color() -> String {
    "#0000ff".into()
}

fn default_base_color() -> String {
    "#006400".into()
}

fn default_base_text_color() -> String {
    "#003200".into()
}

fn default_true() -> bool {
    true
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            target_color: default_target_color(),
            base_color: default_base_color(),
            base_text_color: default_base_text_color(),
            edge_labels: default_true(),
            edge_stats: false,
        }
    }
}
