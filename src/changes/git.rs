//! git subprocess capability.
//!
//! `GitRunner` is the seam between change analysis and the real `git` binary:
//! given a working directory and argument list it returns captured stdout or
//! a `GitError`. `GitCli` shells out with `tokio::process`, so a slow git never
//! blocks the runtime, and bounds every command with a timeout.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::GitError;

#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run `git <args>` inside `working_dir`, returning stdout on success.
    async fn run(&self, working_dir: &Path, args: &[&str]) -> Result<String, GitError>;
}

/// Runs the system `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl GitRunner for GitCli {
    async fn run(&self, working_dir: &Path, args: &[&str]) -> Result<String, GitError> {
        let command = args.join(" ");
        debug!(cwd = %working_dir.display(), "git {command}");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| GitError::Timeout {
                command: command.clone(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::NonZeroExit {
                command,
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(bytes = stdout.len(), "git {command} done");
        Ok(stdout)
    }
}
