use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use gitdelta_core::command::split_command;
use gitdelta_core::{CommandOutput, CommandRunner};
use tokio::process::Command;

/// Runs command lines as child processes, each bounded by `timeout`.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&self, dir: &Path, command: &str) -> CommandOutput {
        let started = Instant::now();
        let Some((program, args)) = split_command(command) else {
            tracing::warn!("refusing to run an empty command");
            return CommandOutput::failed(started.elapsed());
        };

        let child = Command::new(program)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => {
                let elapsed = started.elapsed();
                if !output.status.success() {
                    tracing::warn!(
                        command,
                        status = %output.status,
                        "command exited unsuccessfully"
                    );
                }
                CommandOutput {
                    stdout: output.stdout,
                    stderr: output.stderr,
                    success: output.status.success(),
                    elapsed,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(command, error = %e, "failed to start command");
                CommandOutput::failed(started.elapsed())
            }
            Err(_) => {
                tracing::warn!(
                    command,
                    timeout_secs = self.timeout.as_secs(),
                    "command timed out"
                );
                CommandOutput::failed(started.elapsed())
            }
        }
    }
}
