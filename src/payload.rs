//! Boundary adapter: typed tool results -> JSON text payload.
//!
//! Errors are never raised to the MCP layer. A failed operation still produces
//! a successful tool response whose body is `{"error": "<message>"}`.

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::error::ToolResult;

/// Flatten a tool result into the wire payload.
pub fn to_payload<T: Serialize>(tool: &str, result: ToolResult<T>) -> String {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(s) => s,
            Err(e) => error_payload(tool, &format!("failed to serialize result: {e}")),
        },
        Err(e) => error_payload(tool, &e.to_string()),
    }
}

fn error_payload(tool: &str, message: &str) -> String {
    warn!(tool, error = message, "tool call failed");
    json!({ "error": message }).to_string()
}
