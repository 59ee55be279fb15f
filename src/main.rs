mod runner;

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};

use gitdelta_core::{
    CommandRunner, DeltaConfig, DiagnosticSink, OutputFormat, Severity, TracingSink,
};
use gitdelta_dot::{delta_title, write_graph, DotOptions};
use gitdelta_history::branches::branch_exists;
use gitdelta_history::collect::{annotate_edges, list_branches, load_history};
use gitdelta_history::{difference, edges, DeltaReport, HistoryGraph};

use crate::runner::ProcessRunner;

const CONFIG_FILE: &str = ".gitdelta.toml";

/// Name shown for the base side when no base branch is given.
const NO_BASE: &str = "the big bang";

#[derive(Parser)]
#[command(
    name = "gitdelta",
    version,
    about = "Graph the commits one git branch has that another lacks",
    long_about = "gitdelta reads `git log --parents` for two branches, subtracts the base history\n\
                   from the target history, and writes the remaining commits as a Graphviz graph.\n\
                   Edges into the shared history are drawn dotted towards placeholder nodes.\n\n\
                   Examples:\n  \
                     gitdelta compare topic --base main     Graph what topic adds over main\n  \
                     gitdelta compare main                  Graph the whole history of main\n  \
                     gitdelta compare topic --base main --edge-stats\n  \
                     gitdelta branches                      List branches gitdelta can compare\n  \
                     gitdelta doctor                        Check git and Graphviz"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .gitdelta.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Human-readable summaries (default)\n  \
                         json  Machine-readable JSON with camelCase keys"
    )]
    format: OutputFormat,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Graph the commits of a target branch that a base branch lacks
    #[command(long_about = "Graph the commits of a target branch that a base branch lacks.\n\n\
        Both branches are checked against `git branch -a` first. Without --base the whole\n\
        target history is graphed. With --edge-stats every edge is labelled with the\n\
        insertions and deletions git reports for its range, one `git diff --stat` per edge.\n\n\
        Examples:\n  gitdelta compare topic --base main\n  gitdelta compare topic --base origin/main --output topic.dot")]
    Compare {
        /// Branch whose new commits are graphed
        target: String,

        /// Branch whose history is subtracted (default: none)
        #[arg(long)]
        base: Option<String>,

        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// DOT file to write (default: graph.output from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Annotate every edge with its diff summary
        #[arg(long)]
        edge_stats: bool,

        /// Leave edges unlabelled
        #[arg(long)]
        no_edge_labels: bool,
    },
    /// List the branches of a repository
    Branches {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Summarize `git diff --stat` output from stdin or a file
    #[command(long_about = "Summarize `git diff --stat` output.\n\n\
        Prints +INSERTIONS -DELETIONS for the summary line, `=` for empty input, and an\n\
        empty line when no summary line is found.\n\n\
        Examples:\n  git diff --stat main...topic | gitdelta stat\n  gitdelta stat --file stat.txt")]
    Stat {
        /// Read input from file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Create a default .gitdelta.toml configuration file
    #[command(long_about = "Create a default .gitdelta.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .gitdelta.toml already exists.")]
    Init,
    /// Check the tools gitdelta relies on
    #[command(long_about = "Check the tools gitdelta relies on.\n\n\
        Reports the git repository, the git and Graphviz versions, and the config file.\n\
        Use --format json for machine-readable output.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Forwards diagnostics to tracing and counts the warnings.
#[derive(Default)]
struct CliSink {
    tracing: TracingSink,
    warnings: usize,
}

impl DiagnosticSink for CliSink {
    fn record(&mut self, severity: Severity, message: String) {
        if severity >= Severity::Warning {
            self.warnings += 1;
        }
        self.tracing.record(severity, message);
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("gitdelta v{version}: graph what one branch adds over another\n");

    println!("Quick start:");
    println!("  gitdelta compare topic --base main   Write graph.dot for topic minus main");
    println!("  dot -Tpng -Grankdir=BT graph.dot -o graph.png\n");

    println!("All commands:");
    println!("  compare   Graph the commits a target branch has that a base lacks");
    println!("  branches  List the branches of a repository");
    println!("  stat      Summarize `git diff --stat` output");
    println!("  doctor    Check git and Graphviz");
    println!("  init      Create default configuration\n");

    println!("Run 'gitdelta <command> --help' for details.");
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (quiet, verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<DeltaConfig> {
    let config = match path {
        Some(path) => DeltaConfig::from_file(path)?,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                DeltaConfig::from_file(default_path)?
            } else {
                DeltaConfig::default()
            }
        }
    };
    Ok(config)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn ensure_repository(repo: &Path) -> Result<()> {
    if git2::Repository::discover(repo).is_err() {
        miette::bail!(miette::miette!(
            help = "Run gitdelta inside a git checkout or pass --repo <dir>",
            "{} is not inside a git repository",
            repo.display()
        ));
    }
    Ok(())
}

fn progress_bar(total: usize) -> indicatif::ProgressBar {
    if !std::io::stderr().is_terminal() {
        return indicatif::ProgressBar::hidden();
    }
    let pb = indicatif::ProgressBar::new(total as u64);
    if let Ok(style) =
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:30}] {pos}/{len} ({elapsed})")
    {
        pb.set_style(style);
    }
    pb.set_message("Diffing edges");
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

struct CompareArgs {
    target: String,
    base: Option<String>,
    repo: PathBuf,
    output: PathBuf,
    edge_labels: bool,
    edge_stats: bool,
}

async fn run_compare(config: &DeltaConfig, args: CompareArgs, format: OutputFormat) -> Result<()> {
    ensure_repository(&args.repo)?;
    let runner = ProcessRunner::new(Duration::from_secs(config.git.timeout_secs));
    let mut sink = CliSink::default();

    let branches = list_branches(&runner, &args.repo, &config.git).await?;
    for name in std::iter::once(&args.target).chain(args.base.as_ref()) {
        if !branch_exists(&branches, name) {
            miette::bail!(miette::miette!(
                help = "Run 'gitdelta branches' to list the branches of this repository",
                "unknown branch '{name}'"
            ));
        }
    }

    let base_history = match &args.base {
        Some(base) => load_history(&runner, &args.repo, &config.git, base, &mut sink)
            .await
            .wrap_err(format!("reading history of {base}"))?,
        None => HistoryGraph::new(),
    };
    let target_history = load_history(&runner, &args.repo, &config.git, &args.target, &mut sink)
        .await
        .wrap_err(format!("reading history of {}", args.target))?;
    tracing::info!(
        base = base_history.len(),
        target = target_history.len(),
        "histories loaded"
    );

    let mut delta = difference(&target_history, &base_history, &mut sink)?;

    let annotated = if args.edge_labels && args.edge_stats {
        let pb = progress_bar(edges(&delta, true).len());
        let count = annotate_edges(
            &mut delta,
            &runner,
            &args.repo,
            &config.git,
            &mut sink,
            |done, total| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
            },
        )
        .await;
        pb.finish_and_clear();
        Some(count)
    } else {
        None
    };

    let base_name = args.base.as_deref().unwrap_or(NO_BASE);
    let options = DotOptions {
        edge_labels: args.edge_labels,
        ..DotOptions::from_config(&config.graph)
    }
    .with_title(delta_title(base_name, &args.target, delta.len()));
    std::fs::write(&args.output, write_graph(&delta, &options))
        .into_diagnostic()
        .wrap_err(format!("writing {}", args.output.display()))?;

    match format {
        OutputFormat::Json => {
            println!("{}", DeltaReport::from_graph(&delta).to_json()?);
        }
        OutputFormat::Text => {
            let all_edges = edges(&delta, true);
            let boundary = all_edges.iter().filter(|e| !e.is_resolved()).count();
            println!(
                "{} adds {} commits over {base_name}",
                args.target,
                delta.len()
            );
            println!("  primary path: {} commits", delta.primary_path().count());
            println!(
                "  edges:        {} ({boundary} into shared history)",
                all_edges.len()
            );
            if let Some(count) = annotated {
                println!("  annotated:    {count} edges");
            }
            if sink.warnings > 0 {
                println!("  warnings:     {} (see log output)", sink.warnings);
            }
            println!("\nWrote {}", args.output.display());
            println!(
                "Render with: dot -Tpng -Grankdir=BT -s0.5 {} -o graph.png",
                args.output.display()
            );
        }
    }

    Ok(())
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }
}

/// First `max` characters of the first line of `text`.
fn banner(text: &str, max: usize) -> String {
    text.lines().next().unwrap_or("").trim().chars().take(max).collect()
}

async fn run_doctor(config_path: &Path, format: OutputFormat) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();
    let cwd = std::env::current_dir().into_diagnostic()?;
    let runner = ProcessRunner::new(Duration::from_secs(10));

    match git2::Repository::discover(&cwd) {
        Ok(repo) => {
            let root = repo.workdir().unwrap_or_else(|| repo.path());
            checks.push(CheckResult::pass(
                "git_repository",
                format!("detected at {}", root.display()),
            ));
        }
        Err(_) => checks.push(CheckResult::fail(
            "git_repository",
            "not a git repository",
            "run gitdelta from inside a git repository or pass --repo",
        )),
    }

    let git = runner.run(&cwd, "git --version").await;
    if git.success {
        checks.push(CheckResult::pass("git", banner(&git.stdout_text(), 30)));
    } else {
        checks.push(CheckResult::fail(
            "git",
            "git not found",
            "install git and make sure it is on PATH",
        ));
    }

    // dot prints its version banner on stderr
    let dot = runner.run(&cwd, "dot -V").await;
    if dot.success {
        checks.push(CheckResult::pass("graphviz", banner(&dot.stderr_text(), 30)));
    } else {
        checks.push(CheckResult::fail(
            "graphviz",
            "dot not found",
            "install Graphviz to render the generated .dot files",
        ));
    }

    if config_path.exists() {
        match DeltaConfig::from_file(config_path) {
            Ok(_) => checks.push(CheckResult::pass(
                "config_file",
                format!("{} found", config_path.display()),
            )),
            Err(e) => checks.push(CheckResult::fail(
                "config_file",
                format!("{} is invalid: {e}", config_path.display()),
                "fix the file or remove it to use the defaults",
            )),
        }
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            format!("{} not found", config_path.display()),
            "run 'gitdelta init' to create a default config",
        ));
    }

    let version = env!("CARGO_PKG_VERSION");
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Text => {
            println!("gitdelta v{version}: environment check\n");
            for check in &checks {
                let label = check.name.replace('_', " ");
                println!("  {} {label:<16} {}", check.symbol(), check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }
            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            println!("\n{passed} checks passed, {failed} failed");
        }
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# gitdelta configuration

[git]
# Upper bound for every git command, in seconds
# timeout_secs = 60
# Edge diffs slower than this are reported as huge
# slow_diff_secs = 10
# The branch name is appended to the log command
# log_command = "git log --parents"
# The range label (parent...child) is appended to the diff command
# diff_stat_command = "git diff --stat"
# branch_command = "git branch -a"

[graph]
# output = "graph.dot"
# target_color = "#0000ff"
# base_color = "#006400"
# base_text_color = "#003200"
# edge_labels = true
# edge_stats = false
"##;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(format = %cli.format, "configuration loaded");

    match cli.command {
        None => print_welcome(),
        Some(Command::Compare {
            target,
            base,
            repo,
            output,
            edge_stats,
            no_edge_labels,
        }) => {
            let args = CompareArgs {
                target,
                base,
                repo,
                output: output.unwrap_or_else(|| PathBuf::from(&config.graph.output)),
                edge_labels: config.graph.edge_labels && !no_edge_labels,
                edge_stats: config.graph.edge_stats || edge_stats,
            };
            run_compare(&config, args, cli.format).await?;
        }
        Some(Command::Branches { repo }) => {
            ensure_repository(&repo)?;
            let runner = ProcessRunner::new(Duration::from_secs(config.git.timeout_secs));
            let branches = list_branches(&runner, &repo, &config.git).await?;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&branches).into_diagnostic()?);
                }
                OutputFormat::Text => {
                    for branch in &branches {
                        println!("{branch}");
                    }
                }
            }
        }
        Some(Command::Stat { file }) => {
            let input = read_input(file.as_deref())?;
            let mut sink = CliSink::default();
            let stat = gitdelta_difflens::parse_diff_stat(&input, &mut sink);
            match cli.format {
                OutputFormat::Json => {
                    let json = serde_json::json!({ "stat": stat });
                    println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
                }
                OutputFormat::Text => println!("{stat}"),
            }
        }
        Some(Command::Init) => {
            let path = Path::new(CONFIG_FILE);
            if path.exists() {
                miette::bail!("{CONFIG_FILE} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {CONFIG_FILE} with default configuration");
        }
        Some(Command::Doctor) => {
            let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
            run_doctor(&config_path, cli.format).await?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "gitdelta", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_to_defaults() {
        let config = DeltaConfig::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.git.timeout_secs, 60);
        assert_eq!(config.git.diff_stat_command, "git diff --stat");
        assert_eq!(config.graph.output, "graph.dot");
    }

    #[test]
    fn banner_keeps_first_line_prefix() {
        assert_eq!(
            banner("dot - graphviz version 2.43.0 (0)\nmore\n", 30),
            "dot - graphviz version 2.43.0 "
        );
        assert_eq!(banner("", 30), "");
    }

    #[test]
    fn cli_parses_compare_flags() {
        let cli = Cli::try_parse_from([
            "gitdelta",
            "compare",
            "topic",
            "--base",
            "main",
            "--edge-stats",
            "-vv",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Command::Compare {
                target,
                base,
                edge_stats,
                no_edge_labels,
                ..
            }) => {
                assert_eq!(target, "topic");
                assert_eq!(base.as_deref(), Some("main"));
                assert!(edge_stats);
                assert!(!no_edge_labels);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn cli_sink_counts_warnings_only() {
        let mut sink = CliSink::default();
        sink.record(Severity::Info, "note".into());
        sink.warn("odd line".into());
        assert_eq!(sink.warnings, 1);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
