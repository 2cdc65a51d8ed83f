//! skillpack rules - Show the built-in validation rules

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_robot, robot_ok};
use crate::error::{Result, SkillpackError};
use crate::lint::{RuleCategory, ValidationEngine};
use crate::utils::format::truncate_string;

const DESCRIPTION_WIDTH: usize = 76;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Show the documentation of one rule
    #[arg(long, value_name = "RULE_ID")]
    pub explain: Option<String>,
}

pub fn run(ctx: &AppContext, args: &RulesArgs) -> Result<()> {
    let engine = ValidationEngine::standard(ctx.config.validation.clone());
    let rules = engine.list_rules();

    if let Some(rule_id) = &args.explain {
        let rule = rules
            .iter()
            .find(|r| &r.id == rule_id)
            .ok_or_else(|| SkillpackError::Config(format!("unknown rule '{rule_id}'")))?;

        if ctx.robot_mode {
            return emit_robot(&robot_ok(rule));
        }
        let mut layout = HumanLayout::new();
        layout.title(&format!("Rule: {}", rule.id));
        layout.kv("Name", &rule.name);
        layout.kv("Category", &rule.category.to_string());
        layout.kv("Severity", &rule.default_severity.to_string());
        layout.kv("Metadata", if rule.requires_metadata { "required" } else { "not needed" });
        layout.kv("Enabled", if rule.disabled { "no" } else { "yes" });
        layout.blank();
        layout.section("Description");
        layout.push_line(&rule.description);
        emit_human(layout);
        return Ok(());
    }

    if ctx.robot_mode {
        return emit_robot(&robot_ok(&rules));
    }

    let mut layout = HumanLayout::new();
    layout.title("Validation Rules");
    let categories = [
        (RuleCategory::Structure, "Structure"),
        (RuleCategory::Reference, "Reference"),
        (RuleCategory::Quality, "Quality"),
    ];
    for (category, heading) in categories {
        let in_category: Vec<_> = rules.iter().filter(|r| r.category == category).collect();
        if in_category.is_empty() {
            continue;
        }
        layout.section(heading);
        for rule in in_category {
            let badge = if rule.disabled { " [disabled]" } else { "" };
            layout.bullet(&format!(
                "{} - {} ({}){badge}",
                rule.id, rule.name, rule.default_severity
            ));
            layout.push_line(format!("    {}", truncate_string(&rule.description, DESCRIPTION_WIDTH)));
        }
        layout.blank();
    }
    emit_human(layout);
    Ok(())
}
