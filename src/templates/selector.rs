/*!
Template selection for `suggest_template`.

Maps a caller-supplied change type onto one of the fixed template names:

  feature  -> Feature
  bugfix   -> Bugfix
  refactor -> Refactor
  docs     -> Docs
  test     -> Test

Matching is case-insensitive and total: anything unrecognised (including the
empty string) falls back to `Feature`. The free-form change summary is
accepted but does not influence the choice yet.
*/

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TemplateKind {
    #[default]
    Feature,
    Bugfix,
    Refactor,
    Docs,
    Test,
}

impl TemplateKind {
    pub const fn variants() -> &'static [TemplateKind] {
        &[
            TemplateKind::Feature,
            TemplateKind::Bugfix,
            TemplateKind::Refactor,
            TemplateKind::Docs,
            TemplateKind::Test,
        ]
    }

    /// Case-insensitive lookup; `None` for unknown change types.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        let norm = s.to_lowercase();
        Self::variants()
            .iter()
            .copied()
            .find(|k| k.template_name().to_lowercase() == norm)
    }

    /// Template name as it appears in the template directory.
    pub fn template_name(&self) -> &'static str {
        match self {
            TemplateKind::Feature => "Feature",
            TemplateKind::Bugfix => "Bugfix",
            TemplateKind::Refactor => "Refactor",
            TemplateKind::Docs => "Docs",
            TemplateKind::Test => "Test",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub suggested_template: &'static str,
}

pub fn suggest_template(_changes_summary: &str, change_type: &str) -> Suggestion {
    let kind = TemplateKind::from_str_ci(change_type).unwrap_or_default();
    Suggestion {
        suggested_template: kind.template_name(),
    }
}
