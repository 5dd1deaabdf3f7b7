//! Error types for tool operations.
//!
//! Every tool returns `Result<T, ToolError>` internally; `payload::to_payload`
//! is the only place that turns an error into the `{"error": ...}` wire shape.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single git invocation.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("failed to run `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`git {command}` exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("`git {command}` timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },
}

/// Everything a tool call can fail with.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("no working directory available: {0}")]
    ContextResolution(String),

    #[error(transparent)]
    Subprocess(#[from] GitError),

    #[error("failed to read {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Unclassified(String),
}

impl ToolError {
    pub fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ToolError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
