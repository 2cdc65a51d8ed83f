//! skillpack validate - Validate a skill directory

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_report;
use crate::error::{Result, SkillpackError};
use crate::lint::ValidationEngine;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Skill directory
    pub path: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Skip specific rules (comma-separated IDs)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let mut config = ctx.config.validation.clone();
    if args.strict {
        config = config.strict();
    }
    for rule_id in &args.skip {
        config = config.disable_rule(rule_id.trim());
    }

    let root = ctx.resolve(&args.path);
    let report = ValidationEngine::standard(config).validate_path(&root)?;
    emit_report(ctx.robot_mode, &report)?;

    if report.is_packageable() {
        Ok(())
    } else {
        Err(SkillpackError::ValidationFailed(Box::new(report)))
    }
}
