/*!
Change analysis for the `analyze_file_changes` tool.

Runs three read-only git queries against `<base>...HEAD` in the caller's
working directory:

  git diff <base>...HEAD             full diff text
  git diff --stat <base>...HEAD      per-file additions / deletions
  git diff --name-only <base>...HEAD changed paths

and shapes them into a `ChangeSummary`. The diff is bounded to
`max_diff_lines` lines (plus one marker line) or replaced by a placeholder
when the caller opts out of diff content. `total_lines` always reports the
untruncated count.
*/

pub mod git;

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::ToolResult;
use git::GitRunner;

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_MAX_DIFF_LINES: usize = 500;

/// Replaces the diff when `include_diff` is false.
pub const DIFF_OMITTED_PLACEHOLDER: &str = "Use include_diff=true to see diff";

/// Caller-tunable knobs for one analysis.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub base_branch: String,
    pub include_diff: bool,
    pub max_diff_lines: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            include_diff: true,
            max_diff_lines: DEFAULT_MAX_DIFF_LINES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    /// Raw `git diff --stat` output.
    pub stats: String,
    /// Line count of the full, untruncated diff.
    pub total_lines: usize,
    pub diff: String,
    pub files_changed: Vec<String>,
}

/// Collect a `ChangeSummary` for `working_dir` relative to `opts.base_branch`.
///
/// Any failed query fails the whole analysis; there is no partial result.
pub async fn analyze_changes(
    git: &dyn GitRunner,
    working_dir: &Path,
    opts: &AnalyzeOptions,
) -> ToolResult<ChangeSummary> {
    let range = format!("{}...HEAD", opts.base_branch);
    debug!(cwd = %working_dir.display(), %range, "analyzing changes");

    let diff_args = ["diff", range.as_str()];
    let stat_args = ["diff", "--stat", range.as_str()];
    let name_args = ["diff", "--name-only", range.as_str()];

    let (diff_raw, stats, names) = tokio::try_join!(
        git.run(working_dir, &diff_args),
        git.run(working_dir, &stat_args),
        git.run(working_dir, &name_args),
    )?;

    let total_lines = diff_raw.lines().count();
    let diff = if opts.include_diff {
        truncate_diff(&diff_raw, opts.max_diff_lines)
    } else {
        DIFF_OMITTED_PLACEHOLDER.to_string()
    };

    Ok(ChangeSummary {
        stats,
        total_lines,
        diff,
        files_changed: parse_file_list(&names),
    })
}

/// Keep at most `max_lines` lines, appending one marker line when cut.
///
/// Kept lines are byte-for-byte what git printed, line endings included.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
    let total = diff.lines().count();
    if total <= max_lines {
        return diff.to_string();
    }
    let mut out: String = diff.split_inclusive('\n').take(max_lines).collect();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&format!(
        "... Output truncated. Showing {max_lines} of {total} lines ..."
    ));
    out
}

/// Non-empty paths from `git diff --name-only`, in git's order.
///
/// Paths are kept as printed; leading or trailing spaces are part of the name.
pub fn parse_file_list(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
