//! PR template catalog.
//!
//! Templates are plain markdown files in one directory; the file stem is the
//! template name. The directory is re-read on every call so edits show up
//! without restarting the server.

pub mod selector;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{ToolError, ToolResult};

const TEMPLATE_EXTENSION: &str = "md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct TemplateList {
    pub templates: Vec<Template>,
}

/// Load every `*.md` template in `dir`. A missing directory is an empty catalog.
pub fn list_templates(dir: &Path) -> ToolResult<Vec<Template>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "template directory not found");
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| ToolError::filesystem(dir, e))?;
    let mut templates = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ToolError::filesystem(dir, e))?.path();
        if !is_template_file(&path) {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = fs::read_to_string(&path).map_err(|e| ToolError::filesystem(&path, e))?;
        templates.push(Template {
            name: name.to_string(),
            content,
        });
    }

    // read_dir order is platform dependent
    templates.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %dir.display(), count = templates.len(), "loaded templates");
    Ok(templates)
}

/// Async wrapper: directory scans run on the blocking pool.
pub async fn load_catalog(dir: PathBuf) -> ToolResult<TemplateList> {
    tokio::task::spawn_blocking(move || list_templates(&dir))
        .await
        .map_err(|e| ToolError::Unclassified(format!("template scan task failed: {e}")))?
        .map(|templates| TemplateList { templates })
}

fn is_template_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == TEMPLATE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("does-not-exist");
        assert!(list_templates(&gone).unwrap().is_empty());
    }

    #[test]
    fn empty_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_templates(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn loads_markdown_files_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let a = "## Summary\n\nWhat changed?\n";
        let b = "# Bug\r\n- [ ] repro steps\r\nunicode: ✓\n";
        fs::write(dir.path().join("a.md"), a).unwrap();
        fs::write(dir.path().join("b.md"), b).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.md")).unwrap();

        let templates = list_templates(dir.path()).unwrap();
        assert_eq!(
            templates,
            vec![
                Template {
                    name: "a".into(),
                    content: a.into()
                },
                Template {
                    name: "b".into(),
                    content: b.into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn catalog_serializes_as_templates_array() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Feature.md"), "feat").unwrap();
        let list = load_catalog(dir.path().to_path_buf()).await.unwrap();
        let v = serde_json::to_value(&list).unwrap();
        assert_eq!(
            v,
            serde_json::json!({ "templates": [ { "name": "Feature", "content": "feat" } ] })
        );
    }

    #[tokio::test]
    async fn catalog_for_missing_dir_is_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let list = load_catalog(dir.path().join("nope")).await.unwrap();
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!({ "templates": [] })
        );
    }

    #[test]
    fn shipped_templates_cover_every_suggestion() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
        let names: Vec<String> = list_templates(&dir)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        for kind in selector::TemplateKind::variants() {
            assert!(names.contains(&kind.to_string()), "missing {kind}.md");
        }
    }
}
