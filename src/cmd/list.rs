/*!
`list.rs`

Implements the `list` subcommand: prints the tools the MCP server advertises
without starting a transport.

JSON Output Shape:
{
  "status": "ok",
  "count": 3,
  "tools": [
    { "name": "analyze_file_changes", "description": "...", "params": "base_branch:string, ..." }
  ]
}
*/

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::cmd::shared::param_summary;
use crate::config::ServerConfig;
use crate::mcp::PrAgentServer;

/// CLI arguments for `pr-agent list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_list(args: ListArgs, config: ServerConfig) -> Result<()> {
    let server = PrAgentServer::new(config);
    let rows = tool_rows(&server);

    if args.json {
        let tools: Vec<_> = rows
            .iter()
            .map(|(name, params, desc)| {
                json!({ "name": name, "description": desc, "params": params })
            })
            .collect();
        println!(
            "{}",
            json!({ "status": "ok", "count": tools.len(), "tools": tools })
        );
        return Ok(());
    }

    println!("Tools ({})", rows.len());
    for (name, params, desc) in &rows {
        println!("  {name}");
        println!("    params: {params}");
        println!("    {desc}");
    }
    println!(
        "\nTemplates directory: {}",
        server.config().templates_dir.display()
    );
    Ok(())
}

/// (name, params, description), sorted by name.
fn tool_rows(server: &PrAgentServer) -> Vec<(String, String, String)> {
    let mut rows: Vec<_> = server
        .tool_specs()
        .iter()
        .map(|t| {
            (
                t.name.to_string(),
                param_summary(&t.input_schema),
                t.description
                    .as_deref()
                    .unwrap_or("")
                    .replace('\n', " "),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        List(ListArgs),
    }

    #[test]
    fn clap_parses_list_json() {
        let cli = TestCli::try_parse_from(["t", "list", "--json"]).unwrap();
        let TestSub::List(a) = cli.cmd;
        assert!(a.json);
    }

    #[test]
    fn rows_cover_all_tools() {
        let config = ServerConfig::resolve(Some(PathBuf::from("templates")), None, Some(5));
        let rows = tool_rows(&PrAgentServer::new(config));
        let names: Vec<&str> = rows.iter().map(|r| r.0.as_str()).collect();
        assert_eq!(
            names,
            vec!["analyze_file_changes", "get_pr_templates", "suggest_template"]
        );
        let suggest = &rows[2];
        assert!(suggest.1.contains("change_type:string"));
        assert_eq!(rows[1].1, "-");
    }
}
