//! Working-directory resolution from MCP workspace roots.
//!
//! The client's first root is the repository to inspect. When the client
//! has no roots capability (or lists none) the configured fallback is used;
//! with neither, the call fails with `ContextResolution`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rmcp::model::Root;
use rmcp::service::{Peer, RoleServer};
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ToolError, ToolResult};

const ROOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the working directory for one tool call.
pub async fn resolve_working_dir(
    peer: &Peer<RoleServer>,
    fallback: Option<&Path>,
) -> ToolResult<PathBuf> {
    let supports_roots = peer
        .peer_info()
        .is_some_and(|info| info.capabilities.roots.is_some());

    let from_roots = if supports_roots {
        match timeout(ROOTS_TIMEOUT, peer.list_roots()).await {
            Ok(Ok(result)) => first_root_path(&result.roots)?,
            Ok(Err(e)) => {
                warn!("roots/list failed: {e}");
                None
            }
            Err(_) => {
                warn!("roots/list timed out after {}s", ROOTS_TIMEOUT.as_secs());
                None
            }
        }
    } else {
        debug!("client has no roots capability");
        None
    };

    choose_working_dir(from_roots, fallback)
}

/// Path of the first root; later roots are ignored.
pub fn first_root_path(roots: &[Root]) -> ToolResult<Option<PathBuf>> {
    let Some(root) = roots.first() else {
        return Ok(None);
    };
    root_uri_to_path(&root.uri).map(Some).ok_or_else(|| {
        ToolError::ContextResolution(format!(
            "workspace root '{}' is not a local file:// URI",
            root.uri
        ))
    })
}

/// `file:///abs/path` -> `/abs/path` (percent-decoded). Other schemes -> None.
pub fn root_uri_to_path(uri: &str) -> Option<PathBuf> {
    let url = Url::parse(uri.trim()).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path().ok()
}

pub fn choose_working_dir(
    from_roots: Option<PathBuf>,
    fallback: Option<&Path>,
) -> ToolResult<PathBuf> {
    from_roots
        .or_else(|| fallback.map(Path::to_path_buf))
        .ok_or_else(|| {
            ToolError::ContextResolution(
                "client provided no workspace roots and no fallback working directory is configured (use --workdir or PR_AGENT_WORKDIR)"
                    .to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(uri: &str) -> Root {
        Root {
            uri: uri.to_string(),
            name: None,
        }
    }

    #[cfg(unix)]
    #[test]
    fn file_uri_becomes_path() {
        assert_eq!(
            root_uri_to_path("file:///home/me/repo"),
            Some(PathBuf::from("/home/me/repo"))
        );
        assert_eq!(
            root_uri_to_path("file:///home/me/my%20repo"),
            Some(PathBuf::from("/home/me/my repo"))
        );
    }

    #[test]
    fn non_file_uri_rejected() {
        assert_eq!(root_uri_to_path("https://example.com/repo"), None);
        assert_eq!(root_uri_to_path("not a uri"), None);
    }

    #[cfg(unix)]
    #[test]
    fn only_first_root_counts() {
        let roots = vec![root("file:///first"), root("file:///second")];
        assert_eq!(
            first_root_path(&roots).unwrap(),
            Some(PathBuf::from("/first"))
        );
    }

    #[test]
    fn empty_roots_is_none() {
        assert_eq!(first_root_path(&[]).unwrap(), None);
    }

    #[test]
    fn remote_first_root_is_context_error() {
        let err = first_root_path(&[root("https://example.com")]).unwrap_err();
        assert!(matches!(err, ToolError::ContextResolution(_)));
    }

    #[test]
    fn roots_win_over_fallback() {
        let dir = choose_working_dir(Some(PathBuf::from("/a")), Some(Path::new("/b"))).unwrap();
        assert_eq!(dir, PathBuf::from("/a"));
        let dir = choose_working_dir(None, Some(Path::new("/b"))).unwrap();
        assert_eq!(dir, PathBuf::from("/b"));
    }

    #[test]
    fn nothing_available_is_context_error() {
        let err = choose_working_dir(None, None).unwrap_err();
        assert!(matches!(err, ToolError::ContextResolution(_)));
        assert!(err.to_string().contains("no working directory"));
    }
}
