//! Server configuration.
//!
//! Precedence for every setting: CLI flag > environment variable > default.
//!
//!   --templates-dir  PR_AGENT_TEMPLATES_DIR  <exe>/../../../templates
//!   --workdir        PR_AGENT_WORKDIR        (none)
//!   --git-timeout    PR_AGENT_GIT_TIMEOUT    30 seconds

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const TEMPLATES_DIR_ENV: &str = "PR_AGENT_TEMPLATES_DIR";
pub const WORKDIR_ENV: &str = "PR_AGENT_WORKDIR";
pub const GIT_TIMEOUT_ENV: &str = "PR_AGENT_GIT_TIMEOUT";

pub const DEFAULT_GIT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory scanned by `get_pr_templates`.
    pub templates_dir: PathBuf,
    /// Used when the client exposes no workspace roots.
    pub fallback_workdir: Option<PathBuf>,
    /// Upper bound for each git invocation.
    pub git_timeout: Duration,
}

impl ServerConfig {
    /// Resolve against the process environment.
    pub fn resolve(
        templates_dir: Option<PathBuf>,
        workdir: Option<PathBuf>,
        git_timeout_secs: Option<u64>,
    ) -> Self {
        Self::resolve_with(templates_dir, workdir, git_timeout_secs, |var| {
            env::var(var).ok()
        })
    }

    /// Resolve with `lookup` standing in for the environment.
    pub fn resolve_with(
        templates_dir: Option<PathBuf>,
        workdir: Option<PathBuf>,
        git_timeout_secs: Option<u64>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let templates_dir = templates_dir
            .or_else(|| env_path(&lookup, TEMPLATES_DIR_ENV))
            .unwrap_or_else(default_templates_dir);
        let fallback_workdir = workdir.or_else(|| env_path(&lookup, WORKDIR_ENV));
        let git_timeout = Duration::from_secs(
            git_timeout_secs.unwrap_or_else(|| git_timeout_from_env(&lookup)),
        );
        Self {
            templates_dir,
            fallback_workdir,
            git_timeout,
        }
    }
}

fn env_path(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<PathBuf> {
    lookup(var)
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn git_timeout_from_env(lookup: &impl Fn(&str) -> Option<String>) -> u64 {
    match lookup(GIT_TIMEOUT_ENV) {
        Some(v) if !v.trim().is_empty() => match v.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    GIT_TIMEOUT_ENV, v, DEFAULT_GIT_TIMEOUT_SECS
                );
                DEFAULT_GIT_TIMEOUT_SECS
            }
        },
        _ => DEFAULT_GIT_TIMEOUT_SECS,
    }
}

/// `templates/` three levels above the executable (`<root>/target/<profile>/pr-agent`
/// resolves to `<root>/templates`), or `./templates` when that cannot be determined.
pub fn default_templates_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.ancestors().nth(3).map(|p| p.join("templates")))
        .unwrap_or_else(|| PathBuf::from("templates"))
}
