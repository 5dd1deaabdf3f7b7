/*!
`exec.rs`

Implements the `exec` subcommand: invokes one tool in-process, without an
MCP transport, and prints exactly the JSON payload an MCP client would
receive.

  - Tool selection by name (case-insensitive)
  - Parameter injection via:
      --param KEY=VALUE                (repeatable)
      --param-file params.(json|yaml)  (merged; CLI --param overrides file entries)
  - Values are coerced with the tool's input schema (integer / boolean / ...)
  - The repository is `--workdir` / PR_AGENT_WORKDIR, else the current directory

Exit status is non-zero for usage errors (unknown tool, bad parameters) and
when the payload carries an `error` field.
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::cmd::shared::{build_arguments_from_schema, load_param_file_into_map, parse_params};
use crate::config::ServerConfig;
use crate::error::{ToolError, ToolResult};
use crate::mcp::{PrAgentServer, ToolName};

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Tool name to invoke
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Provide parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Load parameters from file (JSON or YAML). CLI --param overrides file entries
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Pretty-print the payload
    #[arg(long)]
    pub pretty: bool,
}

pub fn execute_exec(args: ExecArgs, config: ServerConfig) -> Result<()> {
    let tool = ToolName::from_str_ci(&args.tool).with_context(|| {
        let known: Vec<&str> = ToolName::variants().iter().map(|t| t.as_str()).collect();
        format!(
            "unknown tool '{}' (available: {})",
            args.tool.trim(),
            known.join(", ")
        )
    })?;

    let mut provided = parse_params(&args.params)?;
    if let Some(ref pf) = args.param_file {
        load_param_file_into_map(pf, &mut provided)?;
    }

    let working_dir = exec_working_dir(config.fallback_workdir.clone());
    let server = PrAgentServer::new(config);

    let spec = server
        .tool_specs()
        .into_iter()
        .find(|t| t.name == tool.as_str())
        .with_context(|| format!("tool '{tool}' is not registered"))?;
    let arguments = build_arguments_from_schema(&spec.input_schema, &provided)
        .with_context(|| format!("Failed to build arguments for {tool}"))?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let payload = rt.block_on(server.invoke(tool, arguments, working_dir))?;

    println!("{}", render(&payload, args.pretty));

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(&payload)
        && let Some(err) = v.get("error").and_then(|e| e.as_str())
    {
        bail!("{tool} failed: {err}");
    }
    Ok(())
}

fn exec_working_dir(configured: Option<PathBuf>) -> ToolResult<PathBuf> {
    match configured {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(|e| {
            ToolError::ContextResolution(format!("cannot determine current directory: {e}"))
        }),
    }
}

fn render(payload: &str, pretty: bool) -> String {
    if !pretty {
        return payload.to_string();
    }
    serde_json::from_str::<serde_json::Value>(payload)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| payload.to_string())
}
