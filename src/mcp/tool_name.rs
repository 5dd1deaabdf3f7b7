/*!
Names of the tools this server advertises.

Helpers:
  - variants()
  - from_str_ci()
  - as_str()
*/

use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ToolName {
    AnalyzeFileChanges,
    GetPrTemplates,
    SuggestTemplate,
}

impl ToolName {
    /// All tools, in advertised order.
    pub const fn variants() -> &'static [ToolName] {
        &[
            ToolName::AnalyzeFileChanges,
            ToolName::GetPrTemplates,
            ToolName::SuggestTemplate,
        ]
    }

    /// Case-insensitive parser (surrounding whitespace ignored).
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.trim().to_ascii_lowercase();
        Self::variants()
            .iter()
            .copied()
            .find(|t| t.as_str() == norm)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            ToolName::AnalyzeFileChanges => "analyze_file_changes",
            ToolName::GetPrTemplates => "get_pr_templates",
            ToolName::SuggestTemplate => "suggest_template",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
