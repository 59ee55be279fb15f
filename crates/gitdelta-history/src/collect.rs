//! Obtaining git text through a [`CommandRunner`] and feeding it to the parsers.

use std::path::Path;

use gitdelta_core::command::with_argument;
use gitdelta_core::{CommandRunner, DeltaError, DiagnosticSink, GitConfig};
use gitdelta_difflens::parse_diff_stat;

use crate::branches::parse_branch_list;
use crate::edges::enumerate_edges;
use crate::graph::HistoryGraph;
use crate::parser::parse_log_to_history;

/// Run the configured log command for `branch` and build its history.
///
/// # Errors
///
/// Returns [`DeltaError::Git`] if the log command fails or times out, and
/// [`DeltaError::Integrity`] if the parsed links contain a cycle.
pub async fn load_history<R: CommandRunner>(
    runner: &R,
    repo: &Path,
    git: &GitConfig,
    branch: &str,
    sink: &mut dyn DiagnosticSink,
) -> Result<HistoryGraph, DeltaError> {
    let command = with_argument(&git.log_command, branch);
    let output = runner.run(repo, &command).await;
    if !output.success {
        return Err(DeltaError::Git(format!(
            "`{command}` failed: {}",
            output.stderr_text().trim()
        )));
    }
    parse_log_to_history(&output.stdout_text(), sink)
}

/// Run the configured branch command and parse its output.
///
/// # Errors
///
/// Returns [`DeltaError::Git`] if the command fails or times out.
pub async fn list_branches<R: CommandRunner>(
    runner: &R,
    repo: &Path,
    git: &GitConfig,
) -> Result<Vec<String>, DeltaError> {
    let output = runner.run(repo, &git.branch_command).await;
    if !output.success {
        return Err(DeltaError::Git(format!(
            "`{}` failed: {}",
            git.branch_command,
            output.stderr_text().trim()
        )));
    }
    Ok(parse_branch_list(&output.stdout_text()))
}

/// Query one diff summary per edge and store the results on `graph`.
///
/// Edges are visited in enumeration order, unresolved edges included. A
/// failed query is reported to `sink` and leaves its edge unannotated.
/// `progress(done, total)` is called after every edge. Returns the number
/// of edges that received an annotation.
pub async fn annotate_edges<R, F>(
    graph: &mut HistoryGraph,
    runner: &R,
    repo: &Path,
    git: &GitConfig,
    sink: &mut dyn DiagnosticSink,
    mut progress: F,
) -> usize
where
    R: CommandRunner,
    F: FnMut(usize, usize),
{
    let labels = enumerate_edges(graph, true);
    let total = labels.len();
    let mut annotated = 0;

    for (done, label) in labels.into_iter().enumerate() {
        let command = with_argument(&git.diff_stat_command, &label);
        let output = runner.run(repo, &command).await;
        if output.success {
            let annotation = parse_diff_stat(&output.stdout_text(), sink);
            if output.elapsed.as_secs() > git.slow_diff_secs {
                sink.warn(format!(
                    "huge diff: {label} [{annotation}] took {}s",
                    output.elapsed.as_secs()
                ));
            }
            if !annotation.is_empty() {
                graph.set_annotation(label, annotation);
                annotated += 1;
            }
        } else {
            sink.warn(format!("error executing `{command}`"));
        }
        progress(done + 1, total);
    }

    annotated
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use gitdelta_core::{CommandOutput, Diagnostics};

    use super::*;

    /// Answers commands from a table and remembers what was asked.
    #[derive(Default)]
    struct FakeRunner {
        responses: HashMap<String, CommandOutput>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRunner {
        fn respond(mut self, command: &str, stdout: &str) -> Self {
            self.responses.insert(
                command.to_string(),
                CommandOutput::succeeded(stdout.as_bytes().to_vec(), Duration::from_millis(5)),
            );
            self
        }

        fn respond_with(mut self, command: &str, output: CommandOutput) -> Self {
            self.responses.insert(command.to_string(), output);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, _dir: &Path, command: &str) -> CommandOutput {
            self.calls.lock().unwrap().push(command.to_string());
            self.responses
                .get(command)
                .cloned()
                .unwrap_or_else(|| CommandOutput::failed(Duration::ZERO))
        }
    }

    const LOG: &str = "\
commit bbbbbbbbbb aaaaaaaaaa 9999999999
Author: dev
Date: now

    tip

commit aaaaaaaaaa
Author: dev
Date: then

    base
";

    #[tokio::test]
    async fn load_history_runs_log_for_branch() {
        let runner = FakeRunner::default().respond("git log --parents feature", LOG);
        let graph = load_history(
            &runner,
            Path::new("."),
            &GitConfig::default(),
            "feature",
            &mut Diagnostics::default(),
        )
        .await
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.primary_path().count(), 2);
        assert_eq!(runner.calls(), vec!["git log --parents feature"]);
    }

    #[tokio::test]
    async fn failed_log_is_a_git_error() {
        let runner = FakeRunner::default();
        let err = load_history(
            &runner,
            Path::new("."),
            &GitConfig::default(),
            "missing",
            &mut Diagnostics::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DeltaError::Git(_)));
    }

    #[tokio::test]
    async fn list_branches_parses_output() {
        let runner = FakeRunner::default().respond("git branch -a", "* main\n  dev\n");
        let branches = list_branches(&runner, Path::new("."), &GitConfig::default())
            .await
            .unwrap();
        assert_eq!(branches, vec!["main", "dev"]);
    }

    #[tokio::test]
    async fn annotate_edges_queries_each_label_in_order() {
        let mut graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        let runner = FakeRunner::default()
            .respond(
                "git diff --stat aaaaaaaa...bbbbbbbb",
                " 2 files changed, 10 insertions(+), 3 deletions(-)\n",
            )
            .respond("git diff --stat 99999999...bbbbbbbb", "");

        let mut sink = Diagnostics::default();
        let mut seen = Vec::new();
        let annotated = annotate_edges(
            &mut graph,
            &runner,
            Path::new("."),
            &GitConfig::default(),
            &mut sink,
            |done, total| seen.push((done, total)),
        )
        .await;

        assert_eq!(annotated, 2);
        assert_eq!(
            runner.calls(),
            vec![
                "git diff --stat aaaaaaaa...bbbbbbbb",
                "git diff --stat 99999999...bbbbbbbb",
            ]
        );
        assert_eq!(graph.annotation("aaaaaaaa...bbbbbbbb"), Some("+10 -3"));
        assert_eq!(graph.annotation("99999999...bbbbbbbb"), Some("="));
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn failed_query_leaves_edge_unannotated() {
        let mut graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        let runner = FakeRunner::default().respond(
            "git diff --stat aaaaaaaa...bbbbbbbb",
            " 1 file changed, 1 insertion(+), 1 deletion(-)\n",
        );

        let mut sink = Diagnostics::default();
        let annotated = annotate_edges(
            &mut graph,
            &runner,
            Path::new("."),
            &GitConfig::default(),
            &mut sink,
            |_, _| {},
        )
        .await;

        assert_eq!(annotated, 1);
        assert!(graph.annotation("99999999...bbbbbbbb").is_none());
        assert!(sink.contains("error executing"));
    }

    #[tokio::test]
    async fn slow_query_is_reported_as_huge() {
        let mut graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        let slow = CommandOutput::succeeded(
            b" 9 files changed, 900 insertions(+), 1 deletion(-)\n".to_vec(),
            Duration::from_secs(30),
        );
        let runner = FakeRunner::default()
            .respond_with("git diff --stat aaaaaaaa...bbbbbbbb", slow)
            .respond("git diff --stat 99999999...bbbbbbbb", "");

        let mut sink = Diagnostics::default();
        annotate_edges(
            &mut graph,
            &runner,
            Path::new("."),
            &GitConfig::default(),
            &mut sink,
            |_, _| {},
        )
        .await;

        assert!(sink.contains("huge diff: aaaaaaaa...bbbbbbbb [+900 -1]"));
    }

    #[tokio::test]
    async fn unparseable_summary_is_not_stored() {
        let mut graph = parse_log_to_history(LOG, &mut Diagnostics::default()).unwrap();
        let runner = FakeRunner::default()
            .respond("git diff --stat aaaaaaaa...bbbbbbbb", "warning: something odd\n")
            .respond("git diff --stat 99999999...bbbbbbbb", "");

        let annotated = annotate_edges(
            &mut graph,
            &runner,
            Path::new("."),
            &GitConfig::default(),
            &mut Diagnostics::default(),
            |_, _| {},
        )
        .await;

        assert_eq!(annotated, 1);
        assert!(graph.annotation("aaaaaaaa...bbbbbbbb").is_none());
    }
}
