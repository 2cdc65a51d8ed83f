//! Validation engine for running rules against skills.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::config::{ValidationConfig, ValidationContext};
use super::diagnostic::{Issue, RuleCategory, Severity};
use super::rule::BoxedRule;
use super::rules::all_rules;
use crate::core::skill::SkillPackage;
use crate::error::Result;

/// Outcome of validating one skill directory.
///
/// Issues are kept sorted by path, then line, so two runs over the same tree
/// produce identical reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Skill name (directory base name)
    pub skill: String,
    /// Directory that was validated
    pub root: PathBuf,
    /// All issues collected
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new(skill: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            skill: skill.into(),
            root: root.into(),
            issues: Vec::new(),
        }
    }

    /// Get error issues
    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    /// Get warning issues
    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// Issues raised by one rule
    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.rule_id == rule_id)
    }

    /// Filter issues by category
    pub fn by_category(&self, category: RuleCategory) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// No error-severity issues; warnings never block packaging.
    #[must_use]
    pub fn is_packageable(&self) -> bool {
        self.error_count() == 0
    }

    /// One-line summary such as `1 error(s), 2 warning(s)`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )
    }

    fn sort(&mut self) {
        self.issues.sort_by(Issue::report_order);
    }
}

/// The validation engine that manages and runs rules
pub struct ValidationEngine {
    rules: Vec<BoxedRule>,
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine with no rules registered
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self {
            rules: Vec::new(),
            config,
        }
    }

    /// Create an engine with every built-in rule registered
    #[must_use]
    pub fn standard(config: ValidationConfig) -> Self {
        let mut engine = Self::new(config);
        for rule in all_rules() {
            engine.register(rule);
        }
        engine
    }

    /// Register a validation rule
    pub fn register(&mut self, rule: BoxedRule) {
        self.rules.push(rule);
    }

    /// Register a validation rule (builder pattern)
    #[must_use]
    pub fn with_rule(mut self, rule: BoxedRule) -> Self {
        self.register(rule);
        self
    }

    /// Get registered rules
    #[must_use]
    pub fn rules(&self) -> &[BoxedRule] {
        &self.rules
    }

    /// Get the config
    #[must_use]
    pub const fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Run every enabled rule against a loaded skill.
    #[must_use]
    pub fn validate(&self, skill: &SkillPackage) -> ValidationReport {
        let ctx = ValidationContext::new(skill, &self.config);
        let mut report = ValidationReport::new(&skill.name, &skill.root);
        let metadata_available = skill.parsed_frontmatter().is_some();

        for rule in &self.rules {
            if self.config.is_rule_disabled(rule.id()) {
                continue;
            }
            if rule.requires_metadata() && !metadata_available {
                debug!(rule = rule.id(), "skipping rule, frontmatter unavailable");
                continue;
            }

            let issues = rule.validate(&ctx);
            debug!(rule = rule.id(), issues = issues.len(), "rule finished");

            for mut issue in issues {
                issue.severity = self.config.effective_severity(&issue.rule_id, issue.severity);
                issue.category = rule.category();
                report.issues.push(issue);
            }
        }

        report.sort();
        info!(
            skill = %report.skill,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation complete"
        );
        report
    }

    /// Load the directory at `root` and validate it.
    pub fn validate_path(&self, root: &Path) -> Result<ValidationReport> {
        let skill = SkillPackage::load(root)?;
        Ok(self.validate(&skill))
    }

    /// List all registered rules
    #[must_use]
    pub fn list_rules(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|r| RuleInfo {
                id: r.id().to_string(),
                name: r.name().to_string(),
                description: r.description().to_string(),
                category: r.category(),
                default_severity: r.default_severity(),
                requires_metadata: r.requires_metadata(),
                disabled: self.config.is_rule_disabled(r.id()),
            })
            .collect()
    }
}

/// Validate the skill at `root` with every built-in rule.
pub fn validate(root: &Path, config: &ValidationConfig) -> Result<ValidationReport> {
    ValidationEngine::standard(config.clone()).validate_path(root)
}

/// Information about a registered rule
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    /// Rule ID
    pub id: String,
    /// Rule name
    pub name: String,
    /// Rule description
    pub description: String,
    /// Rule category
    pub category: RuleCategory,
    /// Default severity
    pub default_severity: Severity,
    /// Whether the rule is skipped on malformed frontmatter
    pub requires_metadata: bool,
    /// Whether the rule is disabled
    pub disabled: bool,
}
