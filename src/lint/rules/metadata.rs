//! Frontmatter validation rules.
//!
//! Both rules need parsed frontmatter and are skipped by the engine when
//! `malformed-frontmatter` fires.

use crate::core::skill::ENTRYPOINT;
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{Issue, RuleCategory, Severity};
use crate::lint::rule::{BoxedRule, ValidationRule};

use super::frontmatter_location;

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Rule that checks required frontmatter keys and flags unknown ones.
pub struct FrontmatterFieldsRule;

impl ValidationRule for FrontmatterFieldsRule {
    fn id(&self) -> &'static str {
        "frontmatter-fields"
    }

    fn name(&self) -> &'static str {
        "Frontmatter Fields"
    }

    fn description(&self) -> &'static str {
        "Frontmatter must set a non-empty name and description; unknown keys are flagged"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn requires_metadata(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(fm) = ctx.skill.parsed_frontmatter() else {
            return vec![];
        };
        let entrypoint = ctx.skill.entrypoint.as_ref();
        let mut issues = Vec::new();

        for (key, value) in [("name", fm.name.as_ref()), ("description", fm.description.as_ref())] {
            if is_blank(value) {
                issues.push(
                    Issue::error(self.id(), format!("frontmatter field '{key}' is missing or empty"))
                        .at(frontmatter_location(entrypoint, key))
                        .with_suggestion(format!("Add '{key}: ...' to the {ENTRYPOINT} frontmatter")),
                );
            }
        }

        let allowed = &ctx.limits().allowed_frontmatter_keys;
        for key in fm.extra.keys().filter(|k| !allowed.contains(k)) {
            issues.push(
                Issue::warning(self.id(), format!("unknown frontmatter key '{key}'"))
                    .at(frontmatter_location(entrypoint, key))
                    .with_suggestion(format!("Allowed keys: {}", allowed.join(", "))),
            );
        }

        issues
    }
}

/// Rule that checks `frontmatter.name` equals the directory name.
pub struct NameMatchRule;

impl ValidationRule for NameMatchRule {
    fn id(&self) -> &'static str {
        "name-match"
    }

    fn name(&self) -> &'static str {
        "Name Match"
    }

    fn description(&self) -> &'static str {
        "The frontmatter name must be identical to the skill directory name"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn requires_metadata(&self) -> bool {
        true
    }

    fn validate(&self, ctx: &ValidationContext<'_>) -> Vec<Issue> {
        let Some(name) = ctx
            .skill
            .parsed_frontmatter()
            .and_then(|fm| fm.name.as_deref())
            .filter(|n| !n.trim().is_empty())
        else {
            // A missing name is reported by frontmatter-fields.
            return vec![];
        };

        if name == ctx.skill.name {
            return vec![];
        }

        vec![
            Issue::error(
                self.id(),
                format!(
                    "frontmatter name '{name}' does not match directory name '{}'",
                    ctx.skill.name
                ),
            )
            .at(frontmatter_location(ctx.skill.entrypoint.as_ref(), "name"))
            .with_suggestion(format!(
                "Set 'name: {}' or rename the directory to '{name}'",
                ctx.skill.name
            )),
        ]
    }
}

pub fn metadata_rules() -> Vec<BoxedRule> {
    vec![Box::new(FrontmatterFieldsRule), Box::new(NameMatchRule)]
}
