//! Content quality rules.
//!
//! The description rules need parsed frontmatter. The body rules read the
//! entrypoint text directly, so they still run when the frontmatter is broken.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::markdown;
use crate::core::skill::ENTRYPOINT;
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{Issue, Location, RuleCategory, Severity};
use crate::lint::rule::{BoxedRule, ValidationRule};

use super::frontmatter_location;

static PLACEHOLDER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(todo|fixme|tbd|xxx)\b\s*:").expect("placeholder regex is valid")
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[[^\]]*\]\s*$").expect("bracket regex is valid"));

// Second-person and first-person openers. Skill bodies are instructions to
// the agent, so they read as commands ("Run the script"), not narration.
static NON_IMPERATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:[-*+>]|\d+[.)])\s+)*(you(?:'ll|'re|'d| should| can| could| will| would| must| need| may| might| have to)|we(?:'ll|'re| will| can| should| need| must)|i(?:'ll|'m| will| can| would)|let's|let us)\b",
    )
    .expect("voice regex is valid")
});

/// Whether a description is still the unedited scaffold placeholder.
pub(crate) fn is_placeholder(description: &str) -> bool {
    PLACEHOLDER_MARKER.is_match(description) || BRACKETED.is_match(description)
}

/// Description text for the description rules, or `None` when there is
/// nothing for them to judge.
fn judged_description<'a>(ctx: &ValidationContext<'a>) -> Option<&'a str> {
    ctx.skill
        .parsed_frontmatter()
        .and_then(|fm| fm.description.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
}

/// Rule that flags the scaffold placeholder description.
pub struct DescriptionPlaceholderRule;

impl ValidationRule for DescriptionPlaceholderRule {
    fn id(&self) -> &'static str {
        "description-placeholder"
    }

    fn name(&self) -> &'static str {
        "Description Placeholder"
    }

    fn description(&self) -> &'static str {
        "The description must be written, not left as a TODO placeholder"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn requires_metadata(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        match judged_description(ctx) {
            Some(description) if is_placeholder(description) => vec![
                Issue::error(self.id(), "description is still a placeholder")
                    .at(frontmatter_location(ctx.skill.entrypoint.as_ref(), "description"))
                    .with_suggestion(
                        "Describe what the skill does and when to use it, e.g. '... Use when the user asks to ...'",
                    ),
            ],
            _ => vec![],
        }
    }
}

/// Rule that bounds the description length.
pub struct DescriptionLengthRule;

impl ValidationRule for DescriptionLengthRule {
    fn id(&self) -> &'static str {
        "description-length"
    }

    fn name(&self) -> &'static str {
        "Description Length"
    }

    fn description(&self) -> &'static str {
        "The description length must stay within the configured character range"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn requires_metadata(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(description) = judged_description(ctx) else {
            return vec![];
        };
        if is_placeholder(description) {
            return vec![];
        }

        let limits = ctx.limits();
        let len = description.chars().count();
        let location = frontmatter_location(ctx.skill.entrypoint.as_ref(), "description");

        if len < limits.description_min_chars {
            vec![
                Issue::error(
                    self.id(),
                    format!(
                        "description is {len} characters, shorter than the minimum of {}",
                        limits.description_min_chars
                    ),
                )
                .at(location)
                .with_suggestion("Say what the skill does and when it should be used"),
            ]
        } else if len > limits.description_max_chars {
            vec![
                Issue::error(
                    self.id(),
                    format!(
                        "description is {len} characters, longer than the maximum of {}",
                        limits.description_max_chars
                    ),
                )
                .at(location)
                .with_suggestion("Move detail into the SKILL.md body"),
            ]
        } else {
            vec![]
        }
    }
}

/// Rule that requires a task-context clause in the description.
pub struct DescriptionContextRule;

impl ValidationRule for DescriptionContextRule {
    fn id(&self) -> &'static str {
        "description-context"
    }

    fn name(&self) -> &'static str {
        "Description Context"
    }

    fn description(&self) -> &'static str {
        "The description must say when the skill applies, e.g. 'Use when ...'"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn requires_metadata(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(description) = judged_description(ctx) else {
            return vec![];
        };
        if is_placeholder(description) {
            return vec![];
        }

        let lowered = markdown::collapse_whitespace(&description.to_lowercase());
        let cues = &ctx.limits().context_cues;
        if cues.iter().any(|cue| lowered.contains(&cue.to_lowercase())) {
            return vec![];
        }

        vec![
            Issue::error(
                self.id(),
                "description does not say when the skill should be used",
            )
            .at(frontmatter_location(ctx.skill.entrypoint.as_ref(), "description"))
            .with_suggestion("Add a clause such as 'Use when the user asks to ...'"),
        ]
    }
}

/// Rule that looks for a Purpose section in the body.
pub struct PurposeSectionRule;

impl ValidationRule for PurposeSectionRule {
    fn id(&self) -> &'static str {
        "purpose-section"
    }

    fn name(&self) -> &'static str {
        "Purpose Section"
    }

    fn description(&self) -> &'static str {
        "SKILL.md should have a heading that states the skill's purpose"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };
        let has_purpose = markdown::headings(&entrypoint.body, entrypoint.body_start_line)
            .iter()
            .any(|(_, text, _)| text.to_lowercase().starts_with("purpose"));
        if has_purpose {
            return vec![];
        }

        vec![
            Issue::warning(self.id(), "no 'Purpose' section found")
                .at(Location::file(ENTRYPOINT))
                .with_suggestion("Add a '## Purpose' heading that explains what the skill is for"),
        ]
    }
}

/// Rule that flags narrative phrasing in the body.
pub struct ImperativeVoiceRule;

impl ValidationRule for ImperativeVoiceRule {
    fn id(&self) -> &'static str {
        "imperative-voice"
    }

    fn name(&self) -> &'static str {
        "Imperative Voice"
    }

    fn description(&self) -> &'static str {
        "Instructions should be written as commands, not in the first or second person"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };

        markdown::prose_lines(&entrypoint.body, entrypoint.body_start_line)
            .into_iter()
            .filter_map(|(line_no, line)| {
                let caps = NON_IMPERATIVE.captures(line)?;
                let opener = caps.get(1)?.as_str().to_string();
                Some(
                    Issue::warning(
                        self.id(),
                        format!("line starts with '{opener}'; prefer the imperative voice"),
                    )
                    .at(Location::line(ENTRYPOINT, line_no))
                    .with_suggestion("Rewrite as a command, e.g. 'Run the script' instead of 'You should run the script'"),
                )
            })
            .collect()
    }
}

/// Rule that flags paragraphs copied between the body and a reference.
pub struct DuplicateContentRule;

impl ValidationRule for DuplicateContentRule {
    fn id(&self) -> &'static str {
        "duplicate-content"
    }

    fn name(&self) -> &'static str {
        "Duplicate Content"
    }

    fn description(&self) -> &'static str {
        "Information should live in SKILL.md or in a reference, not in both"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Quality
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(entrypoint) = &ctx.skill.entrypoint else {
            return vec![];
        };
        let min_chars = ctx.limits().duplicate_min_chars;

        let body_paragraphs: BTreeMap<String, usize> =
            markdown::paragraphs(&entrypoint.body, entrypoint.body_start_line)
                .into_iter()
                .filter(|(text, _)| text.chars().count() >= min_chars)
                .rev()
                .collect();
        if body_paragraphs.is_empty() {
            return vec![];
        }

        let mut issues = Vec::new();
        for (path, text) in &ctx.skill.reference_texts {
            for (paragraph, line) in markdown::paragraphs(text, 1) {
                if let Some(body_line) = body_paragraphs.get(&paragraph) {
                    issues.push(
                        Issue::warning(
                            self.id(),
                            format!("paragraph duplicates {ENTRYPOINT}:{body_line}"),
                        )
                        .at(Location::line(path, line))
                        .with_suggestion("Keep the detail in the reference and link to it from SKILL.md"),
                    );
                }
            }
        }
        issues
    }
}

pub fn quality_rules() -> Vec<BoxedRule> {
    vec![
        Box::new(DescriptionPlaceholderRule),
        Box::new(DescriptionLengthRule),
        Box::new(DescriptionContextRule),
        Box::new(PurposeSectionRule),
        Box::new(ImperativeVoiceRule),
        Box::new(DuplicateContentRule),
    ]
}
