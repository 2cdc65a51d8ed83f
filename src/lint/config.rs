//! Validation configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::diagnostic::Severity;
use crate::core::skill::SkillPackage;

/// Numeric and vocabulary bounds enforced by the built-in rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    /// Minimum description length in characters (`description-length`)
    pub description_min_chars: usize,
    /// Maximum description length in characters (`description-length`)
    pub description_max_chars: usize,
    /// Phrases that mark a task-context clause (`description-context`)
    pub context_cues: Vec<String>,
    /// Maximum lines in the entrypoint (`entrypoint-line-limit`)
    pub max_entrypoint_lines: usize,
    /// Shortest paragraph compared by `duplicate-content`
    pub duplicate_min_chars: usize,
    /// Frontmatter keys that are not reported as unknown (`frontmatter-fields`)
    pub allowed_frontmatter_keys: Vec<String>,
    /// Top-level files besides the entrypoint (`no-auxiliary-files`)
    pub allowed_top_level_files: Vec<String>,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            description_min_chars: 20,
            description_max_chars: 1024,
            context_cues: [
                "use when",
                "use this skill when",
                "use this when",
                "use it when",
                "use for",
                "when the user",
                "when working",
                "when asked",
                "whenever",
                "for tasks",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_entrypoint_lines: 500,
            duplicate_min_chars: 80,
            allowed_frontmatter_keys: ["name", "description", "license", "allowed-tools", "metadata"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_top_level_files: ["LICENSE", "LICENSE.txt", "LICENSE.md"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Configuration for validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Rules to disable by ID
    #[serde(default)]
    pub disabled_rules: BTreeSet<String>,

    /// Severity overrides by rule ID
    #[serde(default)]
    pub severity_overrides: BTreeMap<String, Severity>,

    /// Treat warnings as errors
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub limits: ValidationLimits,
}

impl ValidationConfig {
    /// Create a new default config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable strict mode
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Replace the limits
    #[must_use]
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Disable a rule
    #[must_use]
    pub fn disable_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.disabled_rules.insert(rule_id.into());
        self
    }

    /// Override severity for a rule
    #[must_use]
    pub fn override_severity(mut self, rule_id: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(rule_id.into(), severity);
        self
    }

    /// Check if a rule is disabled
    #[must_use]
    pub fn is_rule_disabled(&self, rule_id: &str) -> bool {
        self.disabled_rules.contains(rule_id)
    }

    /// Get effective severity for a rule
    #[must_use]
    pub fn effective_severity(&self, rule_id: &str, default: Severity) -> Severity {
        let severity = self
            .severity_overrides
            .get(rule_id)
            .copied()
            .unwrap_or(default);

        if self.strict { Severity::Error } else { severity }
    }
}

/// Context provided to validation rules during validation
pub struct ValidationContext<'a> {
    /// The skill being validated
    pub skill: &'a SkillPackage,

    /// Configuration for validation
    pub config: &'a ValidationConfig,
}

impl<'a> ValidationContext<'a> {
    #[must_use]
    pub const fn new(skill: &'a SkillPackage, config: &'a ValidationConfig) -> Self {
        Self { skill, config }
    }

    /// Shorthand for the configured limits
    #[must_use]
    pub const fn limits(&self) -> &'a ValidationLimits {
        &self.config.limits
    }
}
