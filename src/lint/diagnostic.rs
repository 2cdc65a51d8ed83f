//! Issue types for skill validation.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of validation rule
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Directory layout and frontmatter shape
    Structure,
    /// Links between the entrypoint and reference documents
    Reference,
    /// Content quality (descriptions, voice, duplication)
    Quality,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Reference => write!(f, "reference"),
            Self::Quality => write!(f, "quality"),
        }
    }
}

/// Severity level for issues
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should fix, never blocks packaging
    Warning,
    /// Must fix, blocks packaging
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where an issue was found.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the skill root, `/`-separated; `.` is the root itself.
    pub path: String,
    /// 1-indexed line, when the issue points into a text file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    /// The skill directory itself.
    #[must_use]
    pub fn root() -> Self {
        Self {
            path: ".".to_string(),
            line: None,
        }
    }

    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line: None,
        }
    }

    #[must_use]
    pub fn line(path: impl Into<String>, line: usize) -> Self {
        Self {
            path: path.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.path, line),
            None => write!(f, "{}", self.path),
        }
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.line.unwrap_or(0).cmp(&other.line.unwrap_or(0)))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A single finding from validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The rule ID that generated this issue
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// The issue message
    pub message: String,
    /// Where the issue was found
    pub location: Location,
    /// Optional suggestion for fixing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Category of the rule
    pub category: RuleCategory,
}

impl Issue {
    /// Create a new issue located at the skill root
    pub fn new(rule_id: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location: Location::root(),
            suggestion: None,
            category: RuleCategory::Structure,
        }
    }

    /// Create an error issue
    pub fn error(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Error, message)
    }

    /// Create a warning issue
    pub fn warning(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(rule_id, Severity::Warning, message)
    }

    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set a suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Set the category
    #[must_use]
    pub const fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Report order: path, line, then rule and message for ties.
    #[must_use]
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.location
            .cmp(&other.location)
            .then_with(|| self.rule_id.cmp(&other.rule_id))
            .then_with(|| self.message.cmp(&other.message))
            .then_with(|| other.severity.cmp(&self.severity))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.location, self.severity, self.rule_id, self.message
        )?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {suggestion})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_issue_builder() {
        let issue = Issue::error("name-match", "Name differs")
            .at(Location::line("SKILL.md", 2))
            .with_suggestion("Rename it")
            .with_category(RuleCategory::Reference);

        assert_eq!(issue.rule_id, "name-match");
        assert!(issue.is_error());
        assert_eq!(issue.location.line, Some(2));
        assert_eq!(issue.category, RuleCategory::Reference);
        assert_eq!(
            issue.to_string(),
            "SKILL.md:2: error[name-match]: Name differs (hint: Rename it)"
        );
    }

    #[test]
    fn test_report_order_by_path_then_line() {
        let a = Issue::warning("b-rule", "x").at(Location::line("SKILL.md", 9));
        let b = Issue::error("a-rule", "y").at(Location::line("SKILL.md", 10));
        let c = Issue::error("a-rule", "z").at(Location::file("references/a.md"));
        let d = Issue::error("a-rule", "w").at(Location::root());

        let mut issues = vec![c.clone(), b.clone(), a.clone(), d.clone()];
        issues.sort_by(Issue::report_order);
        assert_eq!(issues, vec![d, a, b, c]);
    }

    #[test]
    fn test_location_display() {
        assert_eq!(Location::root().to_string(), ".");
        assert_eq!(Location::line("SKILL.md", 3).to_string(), "SKILL.md:3");
    }
}
