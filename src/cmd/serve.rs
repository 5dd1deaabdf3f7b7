//! `serve` subcommand: run the MCP server over stdio.

use anyhow::{Context, Result};
use clap::Args;

use crate::config::ServerConfig;
use crate::mcp::{self, PrAgentServer};

#[derive(Args, Debug)]
pub struct ServeArgs {}

pub fn execute_serve(_args: ServeArgs, config: ServerConfig) -> Result<()> {
    if !config.templates_dir.is_dir() {
        tracing::warn!(
            dir = %config.templates_dir.display(),
            "templates directory does not exist; get_pr_templates will return an empty list"
        );
    }
    let server = PrAgentServer::new(config);
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(mcp::serve_stdio(server))
}
