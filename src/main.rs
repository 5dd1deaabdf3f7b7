use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod changes;
mod cmd;
mod config;
mod error;
mod mcp;
mod payload;
mod templates;
mod utils;

use cmd::{ExecArgs, ListArgs, ServeArgs};
use config::ServerConfig;

/// PR Agent - MCP server for pull-request preparation
///
/// Tools advertised to the MCP client:
///   analyze_file_changes  diff / stats / changed files against a base branch
///   get_pr_templates      markdown templates from the templates directory
///   suggest_template      map a change type onto a template name
///
/// Command layout:
///   pr-agent serve                                   (stdio MCP server)
///   pr-agent list [--json]                           (advertised tools)
///   pr-agent exec <tool> [--param k=v ...] [--pretty] (invoke in-process)
///
/// Global flags / env:
///   -v / -vv          Increase verbosity (logs go to stderr)
///   -q / --quiet      Errors only
///   --templates-dir   Template directory (or PR_AGENT_TEMPLATES_DIR)
///   --workdir         Repository used when the client sends no roots (or PR_AGENT_WORKDIR)
///   --git-timeout     Seconds allowed per git command (or PR_AGENT_GIT_TIMEOUT, default 30)
///
/// Examples:
///   pr-agent serve --templates-dir ./templates
///   pr-agent exec analyze_file_changes --workdir . --param base_branch=develop --param include_diff=false
///   pr-agent exec suggest_template --param change_type=bugfix --param "changes_summary=fix crash"
#[derive(Parser, Debug)]
#[command(
    name = "pr-agent",
    version,
    about = "PR Agent - MCP server that analyzes git changes and suggests PR templates",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory containing PR templates (*.md)
    #[arg(long = "templates-dir", global = true, value_name = "DIR")]
    templates_dir: Option<PathBuf>,

    /// Repository to inspect when the MCP client provides no workspace roots
    #[arg(short = 'C', long = "workdir", global = true, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Timeout for each git command, in seconds
    #[arg(long = "git-timeout", global = true, value_name = "SECS")]
    git_timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server on stdio
    Serve(ServeArgs),

    /// List the advertised tools
    List(ListArgs),

    /// Invoke a tool directly and print its payload
    Exec(ExecArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    if cli.git_timeout == Some(0) {
        eprintln!("Invalid --git-timeout: must be at least 1 second");
        std::process::exit(2);
    }

    let config = ServerConfig::resolve(cli.templates_dir, cli.workdir, cli.git_timeout);
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Serve(args) => cmd::execute_serve(args, config),
        Commands::List(args) => cmd::execute_list(args, config),
        Commands::Exec(args) => cmd::execute_exec(args, config),
    }
}
