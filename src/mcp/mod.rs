//! MCP server: advertises the PR tools and dispatches calls.
//!
//! analyze_file_changes -> changes::analyze_changes (working dir from client roots)
//! get_pr_templates     -> templates::load_catalog
//! suggest_template     -> templates::selector::suggest_template
//!
//! Every tool answers with a single JSON text item. Failures are reported
//! in-band as `{"error": ...}`; the MCP call itself still succeeds.

pub mod roots;
pub mod tool_name;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, JsonObject, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::{Peer, RoleServer};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde::Deserialize;
use tracing::info;

use crate::changes::git::{GitCli, GitRunner};
use crate::changes::{self, AnalyzeOptions, DEFAULT_BASE_BRANCH, DEFAULT_MAX_DIFF_LINES};
use crate::config::ServerConfig;
use crate::error::ToolResult;
use crate::payload::to_payload;
use crate::templates::{self, selector};
pub use tool_name::ToolName;

/* ---- Tool Input Schemas ---- */

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeFileChangesRequest {
    /// Base branch to compare against (default: main)
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Include the full diff content (default: true)
    #[serde(default = "default_include_diff")]
    pub include_diff: bool,

    /// Maximum number of diff lines to return before truncating (default: 500)
    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: usize,
}

fn default_base_branch() -> String {
    DEFAULT_BASE_BRANCH.to_string()
}

fn default_include_diff() -> bool {
    true
}

fn default_max_diff_lines() -> usize {
    DEFAULT_MAX_DIFF_LINES
}

impl Default for AnalyzeFileChangesRequest {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            include_diff: default_include_diff(),
            max_diff_lines: default_max_diff_lines(),
        }
    }
}

impl From<AnalyzeFileChangesRequest> for AnalyzeOptions {
    fn from(req: AnalyzeFileChangesRequest) -> Self {
        Self {
            base_branch: req.base_branch,
            include_diff: req.include_diff,
            max_diff_lines: req.max_diff_lines,
        }
    }
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SuggestTemplateRequest {
    /// Your analysis of what the changes do
    pub changes_summary: String,

    /// The type of change you've identified (bugfix, feature, docs, refactor, test)
    pub change_type: String,
}

/* ---- Server ---- */

#[derive(Clone)]
pub struct PrAgentServer {
    config: Arc<ServerConfig>,
    git: Arc<dyn GitRunner>,
    tool_router: ToolRouter<Self>,
}

impl PrAgentServer {
    pub fn new(config: ServerConfig) -> Self {
        let git = Arc::new(GitCli::new(config.git_timeout));
        Self::with_git(config, git)
    }

    pub fn with_git(config: ServerConfig, git: Arc<dyn GitRunner>) -> Self {
        Self {
            config: Arc::new(config),
            git,
            tool_router: Self::tool_router(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Advertised tool definitions (name, description, input schema).
    pub fn tool_specs(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    pub async fn analyze_file_changes_payload(
        &self,
        working_dir: ToolResult<PathBuf>,
        req: AnalyzeFileChangesRequest,
    ) -> String {
        let result = match working_dir {
            Ok(dir) => changes::analyze_changes(self.git.as_ref(), &dir, &req.into()).await,
            Err(e) => Err(e),
        };
        to_payload(ToolName::AnalyzeFileChanges.as_str(), result)
    }

    pub async fn get_pr_templates_payload(&self) -> String {
        let result = templates::load_catalog(self.config.templates_dir.clone()).await;
        to_payload(ToolName::GetPrTemplates.as_str(), result)
    }

    pub fn suggest_template_payload(&self, req: &SuggestTemplateRequest) -> String {
        let suggestion = selector::suggest_template(&req.changes_summary, &req.change_type);
        to_payload(ToolName::SuggestTemplate.as_str(), Ok(suggestion))
    }

    /// In-process invocation without an MCP transport (used by `exec`).
    ///
    /// Malformed arguments are a caller error and surface as `Err`; tool
    /// failures are still in-band `{"error": ...}` payloads.
    pub async fn invoke(
        &self,
        tool: ToolName,
        arguments: JsonObject,
        working_dir: ToolResult<PathBuf>,
    ) -> Result<String> {
        let args = serde_json::Value::Object(arguments);
        let payload = match tool {
            ToolName::AnalyzeFileChanges => {
                let req: AnalyzeFileChangesRequest = serde_json::from_value(args)
                    .context("invalid arguments for analyze_file_changes")?;
                self.analyze_file_changes_payload(working_dir, req).await
            }
            ToolName::GetPrTemplates => self.get_pr_templates_payload().await,
            ToolName::SuggestTemplate => {
                let req: SuggestTemplateRequest = serde_json::from_value(args)
                    .context("invalid arguments for suggest_template")?;
                self.suggest_template_payload(&req)
            }
        };
        Ok(payload)
    }
}

fn text_result(payload: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(payload)])
}

#[tool_router]
impl PrAgentServer {
    #[tool(
        description = "Get the full diff and list of changed files in the current git repository, compared against a base branch."
    )]
    async fn analyze_file_changes(
        &self,
        Parameters(req): Parameters<AnalyzeFileChangesRequest>,
        peer: Peer<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let working_dir =
            roots::resolve_working_dir(&peer, self.config.fallback_workdir.as_deref()).await;
        Ok(text_result(
            self.analyze_file_changes_payload(working_dir, req).await,
        ))
    }

    #[tool(description = "List available PR templates with their content.")]
    async fn get_pr_templates(&self) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.get_pr_templates_payload().await))
    }

    #[tool(
        description = "Suggest the most appropriate PR template for a change type (feature, bugfix, refactor, docs, test)."
    )]
    async fn suggest_template(
        &self,
        Parameters(req): Parameters<SuggestTemplateRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.suggest_template_payload(&req)))
    }
}

#[tool_handler]
impl ServerHandler for PrAgentServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PR Agent inspects the git working tree of the first workspace root. Call 'analyze_file_changes' to see the diff against a base branch, classify the change yourself, then call 'suggest_template' and fetch the template text with 'get_pr_templates'."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

/// Serve over stdio until the client disconnects.
pub async fn serve_stdio(server: PrAgentServer) -> Result<()> {
    use rmcp::ServiceExt;
    use rmcp::transport::stdio;

    info!(
        templates_dir = %server.config.templates_dir.display(),
        "starting pr-agent MCP server"
    );
    let running = server
        .serve(stdio())
        .await
        .context("Failed to start MCP server on stdio")?;
    running.waiting().await.context("MCP server task failed")?;
    info!("pr-agent MCP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GitError, ToolError};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::path::Path;
    use std::time::Duration;

    struct CannedGit;

    #[async_trait]
    impl GitRunner for CannedGit {
        async fn run(&self, _dir: &Path, args: &[&str]) -> Result<String, GitError> {
            if args.last().is_some_and(|r| r.starts_with("missing...")) {
                return Err(GitError::NonZeroExit {
                    command: args.join(" "),
                    code: 128,
                    stderr: "fatal: ambiguous argument 'missing...HEAD'".into(),
                });
            }
            Ok(match args.get(1) {
                Some(&"--stat") => " src/lib.rs | 2 +-\n 1 file changed\n".into(),
                Some(&"--name-only") => "src/lib.rs\n".into(),
                _ => "-old\n+new\n".into(),
            })
        }
    }

    fn server_with_templates(dir: &Path) -> PrAgentServer {
        let config = ServerConfig {
            templates_dir: dir.to_path_buf(),
            fallback_workdir: None,
            git_timeout: Duration::from_secs(5),
        };
        PrAgentServer::with_git(config, Arc::new(CannedGit))
    }

    fn parse(payload: &str) -> Value {
        serde_json::from_str(payload).unwrap()
    }

    #[test]
    fn advertises_three_tools() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());
        let mut names: Vec<String> = server
            .tool_specs()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["analyze_file_changes", "get_pr_templates", "suggest_template"]
        );
    }

    #[test]
    fn analyze_schema_has_no_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());
        let tool = server
            .tool_specs()
            .into_iter()
            .find(|t| t.name == "analyze_file_changes")
            .unwrap();
        let schema = Value::Object((*tool.input_schema).clone());
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("base_branch"));
        assert!(props.contains_key("include_diff"));
        assert!(props.contains_key("max_diff_lines"));
        let required = schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.len())
            .unwrap_or(0);
        assert_eq!(required, 0);
    }

    #[tokio::test]
    async fn analyze_payload_has_wire_fields() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());
        let out = server
            .analyze_file_changes_payload(
                Ok(PathBuf::from("/repo")),
                AnalyzeFileChangesRequest::default(),
            )
            .await;
        assert_eq!(
            parse(&out),
            json!({
                "stats": " src/lib.rs | 2 +-\n 1 file changed\n",
                "total_lines": 2,
                "diff": "-old\n+new\n",
                "files_changed": ["src/lib.rs"]
            })
        );
    }

    #[tokio::test]
    async fn analyze_failure_is_error_only() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());
        let req = AnalyzeFileChangesRequest {
            base_branch: "missing".into(),
            ..Default::default()
        };
        let v = parse(
            &server
                .analyze_file_changes_payload(Ok(PathBuf::from("/repo")), req)
                .await,
        );
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj["error"].as_str().unwrap().contains("ambiguous argument"));
    }

    #[tokio::test]
    async fn missing_working_dir_is_error_payload() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());
        let v = parse(
            &server
                .analyze_file_changes_payload(
                    Err(ToolError::ContextResolution("no roots".into())),
                    AnalyzeFileChangesRequest::default(),
                )
                .await,
        );
        assert!(
            v["error"]
                .as_str()
                .unwrap()
                .contains("no working directory")
        );
    }

    #[tokio::test]
    async fn templates_payload_lists_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "alpha").unwrap();
        std::fs::write(dir.path().join("b.md"), "beta").unwrap();
        let server = server_with_templates(dir.path());
        let v = parse(&server.get_pr_templates_payload().await);
        assert_eq!(
            v,
            json!({ "templates": [
                { "name": "a", "content": "alpha" },
                { "name": "b", "content": "beta" }
            ]})
        );
    }

    #[tokio::test]
    async fn invoke_applies_defaults_and_rejects_bad_args() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_templates(dir.path());

        let out = server
            .invoke(
                ToolName::AnalyzeFileChanges,
                JsonObject::new(),
                Ok(PathBuf::from("/repo")),
            )
            .await
            .unwrap();
        assert_eq!(parse(&out)["total_lines"], json!(2));

        let mut args = JsonObject::new();
        args.insert("changes_summary".into(), json!("fix crash"));
        args.insert("change_type".into(), json!("BugFix"));
        let out = server
            .invoke(ToolName::SuggestTemplate, args, Ok(PathBuf::from("/repo")))
            .await
            .unwrap();
        assert_eq!(parse(&out), json!({ "suggested_template": "Bugfix" }));

        let err = server
            .invoke(
                ToolName::SuggestTemplate,
                JsonObject::new(),
                Ok(PathBuf::from("/repo")),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("suggest_template"));
    }
}
